use std::fs::{self, File};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use peershare_config::BUFFER_SIZE;
use peershare_core::entities::{is_safe_name, FetchOutcome, FirstReply};
use peershare_core::errors::FetchError;
use peershare_core::utils::create_buffer;

use crate::LOGGER;

/// Performs one download from `host:port` into `download_root`.
///
/// Every failure is folded into the returned outcome; nothing panics and
/// nothing propagates past this function. The connection closes on every
/// path when the stream drops.
pub fn fetch(host: &str, port: u16, filename: &str, download_root: &Path) -> FetchOutcome {
    if !is_safe_name(filename) {
        return FetchOutcome::Failed(FetchError::UnsafeName(filename.to_string()));
    }

    let mut stream = match TcpStream::connect((host, port)) {
        Ok(s) => s,
        Err(e) => return FetchOutcome::Failed(FetchError::Connect(e)),
    };
    LOGGER.debug(format!("connected to {}:{}", host, port));

    if let Err(e) = stream.write_all(format!("GET {}", filename).as_bytes()) {
        return FetchOutcome::Failed(FetchError::Transport(e));
    }

    let mut buf = create_buffer(BUFFER_SIZE);
    let n = match stream.read(&mut buf) {
        Ok(n) => n,
        Err(e) => return FetchOutcome::Failed(FetchError::Transport(e)),
    };

    match FirstReply::classify(&buf[..n]) {
        FirstReply::Ok { remainder } => {
            let path = download_root.join(filename);
            match receive_into(&mut stream, &path, remainder) {
                Ok(bytes) => {
                    LOGGER.info(format!("downloaded '{}' ({} bytes)", filename, bytes));
                    FetchOutcome::Downloaded {
                        filename: filename.to_string(),
                        path,
                        bytes,
                    }
                }
                Err(e) => {
                    // Half a file must not look like a finished download.
                    let _ = fs::remove_file(&path);
                    FetchOutcome::Failed(e)
                }
            }
        }
        FirstReply::NotFound => FetchOutcome::NotFound {
            filename: filename.to_string(),
        },
        FirstReply::Invalid => FetchOutcome::InvalidReply,
    }
}

/// Writes `first` and then every further chunk to `path` until the peer
/// closes the connection. A zero-length read is the only end-of-stream
/// signal the protocol has, so a clean close from a dying peer is
/// indistinguishable from completion.
fn receive_into(stream: &mut TcpStream, path: &Path, first: &[u8]) -> Result<u64, FetchError> {
    let mut file = File::create(path).map_err(FetchError::LocalIo)?;
    file.write_all(first).map_err(FetchError::LocalIo)?;
    let mut received = first.len() as u64;

    let mut buf = create_buffer(BUFFER_SIZE);
    loop {
        let n = stream.read(&mut buf).map_err(FetchError::Transport)?;
        if n == 0 {
            return Ok(received);
        }
        file.write_all(&buf[..n]).map_err(FetchError::LocalIo)?;
        received += n as u64;
    }
}

/// Caller-facing variant: runs `fetch` on its own thread so a slow or
/// stalled peer never blocks the caller, and delivers exactly one rendered
/// status line to `on_result`.
pub fn fetch_detached<F>(
    host: String,
    port: u16,
    filename: String,
    download_root: PathBuf,
    on_result: F,
) -> JoinHandle<()>
where
    F: FnOnce(String) + Send + 'static,
{
    thread::spawn(move || {
        let outcome = fetch(&host, port, &filename, &download_root);
        on_result(outcome.to_string());
    })
}
