use std::fmt;
use std::path::PathBuf;

use crate::errors::FetchError;

#[derive(Debug)]
/// Terminal status of one fetch attempt. Exactly one of these is reported to
/// the caller per attempt, rendered through `Display`.
pub enum FetchOutcome {
    Downloaded {
        filename: String,
        path: PathBuf,
        bytes: u64,
    },
    NotFound {
        filename: String,
    },
    InvalidReply,
    Failed(FetchError),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Downloaded { .. })
    }
}

impl fmt::Display for FetchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchOutcome::Downloaded { filename, path, .. } => write!(
                f,
                "File '{}' downloaded successfully to {}.",
                filename,
                path.display()
            ),
            FetchOutcome::NotFound { filename } => {
                write!(f, "File '{}' not found on peer.", filename)
            }
            FetchOutcome::InvalidReply => write!(f, "Invalid response from peer."),
            FetchOutcome::Failed(e) => write!(f, "Error: {}", e),
        }
    }
}
