use std::fs::File;
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::path::Path;

use peershare_config::BUFFER_SIZE;
use peershare_core::entities::{Reply, Request};
use peershare_core::utils::create_buffer;

use crate::LOGGER;

/// Serves exactly one request on `stream`, then lets the connection drop.
///
/// All failures stay inside this function; a broken connection or an
/// unreadable file must never take down the accept loop or another transfer.
pub fn handle_peer(mut stream: TcpStream, share_root: &Path) {
    if let Err(e) = serve_request(&mut stream, share_root) {
        LOGGER.error(format!("handler: {}", e));
    }
}

fn serve_request(stream: &mut TcpStream, share_root: &Path) -> io::Result<()> {
    // One read is the whole request; the protocol has no multi-read framing.
    let mut buf = create_buffer(BUFFER_SIZE);
    let n = stream.read(&mut buf)?;

    let request = match Request::parse(&buf[..n]) {
        Some(r) => r,
        None => {
            LOGGER.debug("invalid request");
            return stream.write_all(Reply::Invalid.marker());
        }
    };

    // Resolution refuses anything that is not a bare file name, and the file
    // may vanish between a peer's listing and this request; both are a plain
    // not-found.
    let opened = request
        .resolve(share_root)
        .and_then(|path| open_regular(&path));
    let mut file = match opened {
        Some(f) => f,
        None => {
            LOGGER.debug(format!("not found: {}", request.filename));
            return stream.write_all(Reply::NotFound.marker());
        }
    };

    stream.write_all(Reply::Ok.marker())?;
    let sent = stream_file(&mut file, stream, &mut buf)?;
    LOGGER.info(format!("served '{}' ({} bytes)", request.filename, sent));
    Ok(())
}

fn open_regular(path: &Path) -> Option<File> {
    let file = File::open(path).ok()?;
    let meta = file.metadata().ok()?;
    if meta.is_file() {
        Some(file)
    } else {
        None
    }
}

/// Chunked copy until EOF. Completion is signaled to the peer only by the
/// connection closing afterwards; there is no terminator on the wire.
fn stream_file(file: &mut File, stream: &mut TcpStream, buf: &mut [u8]) -> io::Result<u64> {
    let mut sent = 0u64;
    loop {
        let n = file.read(buf)?;
        if n == 0 {
            return Ok(sent);
        }
        stream.write_all(&buf[..n])?;
        sent += n as u64;
    }
}
