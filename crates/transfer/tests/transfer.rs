use std::fs;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::PathBuf;
use std::thread;

use tempfile::{tempdir, TempDir};

use peershare_transfer::{fetch, fetch_detached, listener, PeerDirs};

/// Spins up a real listener over a temp ShareRoot and hands back the port
/// plus both roots.
fn start_peer() -> (TempDir, PeerDirs, u16) {
    let base = tempdir().unwrap();
    let dirs = PeerDirs::under(base.path());
    dirs.bootstrap().unwrap();

    let mut bound_port = 0u16;
    listener::start(dirs.share_root.clone(), |_ip, port| bound_port = port).unwrap();

    (base, dirs, bound_port)
}

fn share_file(dirs: &PeerDirs, name: &str, contents: &[u8]) -> PathBuf {
    let path = dirs.share_root.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Sends raw bytes as the request and returns the entire reply, read until
/// the server closes the connection.
fn raw_request(port: u16, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
    stream.write_all(request).unwrap();
    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).unwrap();
    reply
}

#[test]
fn fetched_file_is_byte_identical() {
    let (_base, dirs, port) = start_peer();
    share_file(&dirs, "a.txt", b"hello");

    let outcome = fetch("127.0.0.1", port, "a.txt", &dirs.download_root);
    assert!(outcome.is_success(), "unexpected outcome: {outcome}");
    assert_eq!(fs::read(dirs.download_root.join("a.txt")).unwrap(), b"hello");
}

#[test]
fn multi_chunk_file_survives_the_round_trip() {
    let (_base, dirs, port) = start_peer();
    let payload: Vec<u8> = (0..3000u32).map(|i| (i % 251) as u8).collect();
    share_file(&dirs, "big.bin", &payload);

    let outcome = fetch("127.0.0.1", port, "big.bin", &dirs.download_root);
    assert!(outcome.is_success(), "unexpected outcome: {outcome}");
    assert_eq!(
        fs::read(dirs.download_root.join("big.bin")).unwrap(),
        payload
    );
}

#[test]
fn fetch_is_idempotent_and_leaves_share_root_alone() {
    let (_base, dirs, port) = start_peer();
    let source = share_file(&dirs, "a.txt", b"hello");

    assert!(fetch("127.0.0.1", port, "a.txt", &dirs.download_root).is_success());
    assert!(fetch("127.0.0.1", port, "a.txt", &dirs.download_root).is_success());

    assert_eq!(fs::read(dirs.download_root.join("a.txt")).unwrap(), b"hello");
    assert_eq!(fs::read(source).unwrap(), b"hello");
}

#[test]
fn missing_file_reports_not_found_and_writes_nothing() {
    let (_base, dirs, port) = start_peer();

    let outcome = fetch("127.0.0.1", port, "missing.txt", &dirs.download_root);
    assert_eq!(
        outcome.to_string(),
        "File 'missing.txt' not found on peer."
    );
    assert!(!dirs.download_root.join("missing.txt").exists());
}

#[test]
fn ok_scenario_on_the_wire() {
    let (_base, dirs, port) = start_peer();
    share_file(&dirs, "a.txt", b"hello");

    let reply = raw_request(port, b"GET a.txt");
    assert!(reply.starts_with(b"OK"));
    assert_eq!(&reply[2..], b"hello");
}

#[test]
fn not_found_scenario_on_the_wire() {
    let (_base, _dirs, port) = start_peer();
    assert_eq!(raw_request(port, b"GET missing.txt"), b"FILE_NOT_FOUND");
}

#[test]
fn malformed_requests_get_invalid_marker() {
    let (_base, dirs, port) = start_peer();
    share_file(&dirs, "a.txt", b"hello");

    assert_eq!(raw_request(port, b"FETCH a.txt"), b"INVALID_REQUEST");
    assert_eq!(raw_request(port, b"GET"), b"INVALID_REQUEST");
    assert_eq!(raw_request(port, b"hello"), b"INVALID_REQUEST");
}

#[test]
fn empty_request_gets_invalid_marker() {
    let (_base, _dirs, port) = start_peer();

    let mut stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
    stream.shutdown(Shutdown::Write).unwrap();
    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).unwrap();
    assert_eq!(reply, b"INVALID_REQUEST");
}

#[test]
fn traversal_names_are_refused_by_the_server() {
    let (base, _dirs, port) = start_peer();
    // A real file one level above ShareRoot must stay unreachable.
    fs::write(base.path().join("secret.txt"), b"secret").unwrap();

    assert_eq!(raw_request(port, b"GET ../secret.txt"), b"FILE_NOT_FOUND");
}

#[test]
fn traversal_names_are_refused_by_the_fetcher() {
    let (_base, dirs, port) = start_peer();

    let outcome = fetch("127.0.0.1", port, "../escape.txt", &dirs.download_root);
    assert!(outcome.to_string().starts_with("Error: "));
}

#[test]
fn concurrent_fetches_all_complete() {
    let (_base, dirs, port) = start_peer();
    let mut expected = Vec::new();
    for i in 0..4 {
        let name = format!("file{i}.bin");
        let payload = vec![i as u8; 1500 + i * 17];
        share_file(&dirs, &name, &payload);
        expected.push((name, payload));
    }

    let handles: Vec<_> = expected
        .iter()
        .map(|(name, _)| {
            let name = name.clone();
            let root = dirs.download_root.clone();
            thread::spawn(move || fetch("127.0.0.1", port, &name, &root).is_success())
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }

    for (name, payload) in expected {
        assert_eq!(fs::read(dirs.download_root.join(name)).unwrap(), payload);
    }
}

#[test]
fn idle_connection_does_not_block_other_transfers() {
    let (_base, dirs, port) = start_peer();
    share_file(&dirs, "a.txt", b"hello");

    // A peer that connects and never sends pins one handler thread only.
    let _idle = TcpStream::connect(("127.0.0.1", port)).unwrap();

    let outcome = fetch("127.0.0.1", port, "a.txt", &dirs.download_root);
    assert!(outcome.is_success(), "unexpected outcome: {outcome}");
}

#[test]
fn marker_coalesced_with_payload_still_downloads_cleanly() {
    // A peer whose TCP stack delivers "OK" and the first chunk in one
    // segment; the fetcher must not lose those bytes.
    let fake_peer = TcpListener::bind(("127.0.0.1", 0)).unwrap();
    let port = fake_peer.local_addr().unwrap().port();
    thread::spawn(move || {
        let (mut stream, _) = fake_peer.accept().unwrap();
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).unwrap();
        stream.write_all(b"OKhello").unwrap();
    });

    let base = tempdir().unwrap();
    let dirs = PeerDirs::under(base.path());
    dirs.bootstrap().unwrap();

    let outcome = fetch("127.0.0.1", port, "a.txt", &dirs.download_root);
    assert!(outcome.is_success(), "unexpected outcome: {outcome}");
    assert_eq!(fs::read(dirs.download_root.join("a.txt")).unwrap(), b"hello");
}

#[test]
fn garbage_reply_reports_invalid_response() {
    let fake_peer = TcpListener::bind(("127.0.0.1", 0)).unwrap();
    let port = fake_peer.local_addr().unwrap().port();
    thread::spawn(move || {
        let (mut stream, _) = fake_peer.accept().unwrap();
        let mut buf = [0u8; 1024];
        let _ = stream.read(&mut buf).unwrap();
        stream.write_all(b"WHO_ARE_YOU").unwrap();
    });

    let base = tempdir().unwrap();
    let dirs = PeerDirs::under(base.path());
    dirs.bootstrap().unwrap();

    let outcome = fetch("127.0.0.1", port, "a.txt", &dirs.download_root);
    assert_eq!(outcome.to_string(), "Invalid response from peer.");
    assert!(!dirs.download_root.join("a.txt").exists());
}

#[test]
fn unreachable_peer_reports_an_error_outcome() {
    let base = tempdir().unwrap();
    let dirs = PeerDirs::under(base.path());
    dirs.bootstrap().unwrap();

    // Bind a port and drop it so nothing is listening there.
    let port = {
        let socket = TcpListener::bind(("127.0.0.1", 0)).unwrap();
        socket.local_addr().unwrap().port()
    };

    let outcome = fetch("127.0.0.1", port, "a.txt", &dirs.download_root);
    assert!(outcome.to_string().starts_with("Error: "));
    assert!(!dirs.download_root.join("a.txt").exists());
}

#[test]
fn detached_fetch_reports_exactly_one_status_line() {
    let (_base, dirs, port) = start_peer();
    share_file(&dirs, "a.txt", b"hello");

    let (tx, rx) = std::sync::mpsc::channel();
    let handle = fetch_detached(
        "127.0.0.1".to_string(),
        port,
        "a.txt".to_string(),
        dirs.download_root.clone(),
        move |message| tx.send(message).unwrap(),
    );
    handle.join().unwrap();

    let message = rx.recv().unwrap();
    assert!(
        message.starts_with("File 'a.txt' downloaded successfully to "),
        "unexpected status: {message}"
    );
    assert!(rx.recv().is_err());
}
