//! End-to-end test of the logger against a real TCP listener.

use freerun_diag::{
    diag_log, DiagnosticLogger, LoggerConfig, LoggerState, TcpNetwork, LOG_BUFFER_SIZE,
};
use std::io::Read;
use std::net::TcpListener;
use std::time::Duration;

#[test]
fn logger_sends_fixed_size_frames_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let logger = DiagnosticLogger::new(
        LoggerConfig::new("127.0.0.1", port).with_connect_timeout(Duration::from_secs(2)),
    );
    logger.init(&mut TcpNetwork::new()).unwrap();
    assert_eq!(logger.state(), LoggerState::Connected);

    let (mut conn, _) = listener.accept().unwrap();

    diag_log!(logger, "write {} bytes at {}", 40, 96);
    diag_log!(logger, "second");

    let mut received = vec![0u8; LOG_BUFFER_SIZE * 2];
    conn.read_exact(&mut received).unwrap();

    let first = &received[..LOG_BUFFER_SIZE];
    let second = &received[LOG_BUFFER_SIZE..];
    assert!(first.starts_with(b"write 40 bytes at 96"));
    assert!(second.starts_with(b"second"));
    assert_eq!(second[6], 0);
}

#[test]
fn logger_refused_connection_is_disconnected() {
    // Bind then drop to get a port nobody listens on.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let logger = DiagnosticLogger::new(
        LoggerConfig::new("127.0.0.1", port).with_connect_timeout(Duration::from_millis(500)),
    );
    assert!(logger.init(&mut TcpNetwork::new()).is_err());
    assert_eq!(logger.state(), LoggerState::Disconnected);

    // Logging after a failed init is a silent no-op.
    diag_log!(logger, "ignored");
}
