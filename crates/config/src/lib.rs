use std::net::Ipv4Addr;

/// Size of one wire read/write and of one file chunk.
pub const BUFFER_SIZE: usize = 1024;

pub const SHARED_DIR: &str = "shared";
pub const DOWNLOADS_DIR: &str = "downloads";

/// The listener binds to all interfaces; the OS picks the port.
pub const LOCAL_NETWORK: Ipv4Addr = Ipv4Addr::new(0, 0, 0, 0);

pub const MARKER_OK: &[u8] = b"OK";
pub const MARKER_NOT_FOUND: &[u8] = b"FILE_NOT_FOUND";
pub const MARKER_INVALID: &[u8] = b"INVALID_REQUEST";

/// Address the routable-IP probe points at; no packet is ever sent to it.
pub const IP_PROBE_ADDR: &str = "8.8.8.8:80";
