use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
/// Startup failure of the listening service. Bind problems are fatal and go
/// back to the caller instead of being retried.
pub enum ListenError {
    #[error("failed to bind listening socket: {0}")]
    Bind(#[from] io::Error),
}

#[derive(Debug, Error)]
/// Everything that can end a fetch without a reply from the peer deciding
/// the outcome.
pub enum FetchError {
    #[error("refusing file name '{0}': not a bare file name")]
    UnsafeName(String),
    #[error("could not connect to peer: {0}")]
    Connect(io::Error),
    #[error("connection lost during transfer: {0}")]
    Transport(io::Error),
    #[error("could not write local file: {0}")]
    LocalIo(io::Error),
}
