use std::net::{IpAddr, TcpListener, UdpSocket};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use peershare_config::{IP_PROBE_ADDR, LOCAL_NETWORK};
use peershare_core::errors::ListenError;

use crate::handler::handle_peer;
use crate::LOGGER;

/// Binds the listening socket, reports the advertisable address exactly once
/// through `on_bound`, and moves the accept loop onto its own thread.
///
/// Binding uses port 0 so several peers can coexist on one host; the OS
/// allocation is what `on_bound` receives. A bind failure is returned before
/// any thread is spawned. The returned handle never joins under normal
/// operation.
pub fn start<F>(share_root: PathBuf, on_bound: F) -> Result<JoinHandle<()>, ListenError>
where
    F: FnOnce(IpAddr, u16),
{
    let listener = TcpListener::bind((LOCAL_NETWORK, 0))?;
    let port = listener.local_addr()?.port();
    let ip = routable_ip();
    LOGGER.info(format!("listening on {}:{}", ip, port));
    on_bound(ip, port);

    Ok(thread::spawn(move || accept_loop(listener, share_root)))
}

/// Accepts forever. Transfer I/O never runs on this thread: every accepted
/// connection gets its own handler thread, unbounded, and a failed accept
/// only costs a log line.
fn accept_loop(listener: TcpListener, share_root: PathBuf) {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                LOGGER.debug(format!("accepted {:?}", stream.peer_addr().ok()));
                let root = share_root.clone();
                thread::spawn(move || handle_peer(stream, &root));
            }
            Err(e) => {
                LOGGER.error(format!("accept failed: {}", e));
            }
        }
    }
}

/// Best-effort view of the address peers should dial. Connecting a UDP
/// socket sends nothing; it only asks the OS which local address would route
/// toward the wider network. Falls back to loopback on an offline host.
fn routable_ip() -> IpAddr {
    let probe = UdpSocket::bind((LOCAL_NETWORK, 0)).and_then(|socket| {
        socket.connect(IP_PROBE_ADDR)?;
        socket.local_addr()
    });
    match probe {
        Ok(addr) => addr.ip(),
        Err(e) => {
            LOGGER.debug(format!("routable-ip probe failed: {}", e));
            IpAddr::from([127, 0, 0, 1])
        }
    }
}
