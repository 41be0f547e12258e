//! Network stack abstraction used by the logger.

use parking_lot::Mutex;
use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A connected, write-only socket.
pub type Socket = Box<dyn Write + Send>;

/// The platform network services the logger needs.
///
/// Connectivity is requested once and then polled; a stack may report the
/// request as pending for a while before settling on available or not.
pub trait NetworkStack {
    /// Brings up the socket layer.
    fn initialize(&mut self) -> io::Result<()>;

    /// Submits a request for network connectivity.
    fn request_connectivity(&mut self);

    /// Returns true while the connectivity request is unresolved.
    fn is_connectivity_pending(&self) -> bool;

    /// Returns true if the resolved request granted connectivity.
    fn is_connectivity_available(&self) -> bool;

    /// Opens a stream socket and connects it to `addr`.
    fn connect(&mut self, addr: SocketAddr, timeout: Duration) -> io::Result<Socket>;
}

/// [`NetworkStack`] over the host's TCP/IP stack.
///
/// Connectivity is assumed to be available as soon as it is requested.
#[derive(Debug, Default)]
pub struct TcpNetwork;

impl TcpNetwork {
    /// Creates the host network stack.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl NetworkStack for TcpNetwork {
    fn initialize(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn request_connectivity(&mut self) {}

    fn is_connectivity_pending(&self) -> bool {
        false
    }

    fn is_connectivity_available(&self) -> bool {
        true
    }

    fn connect(&mut self, addr: SocketAddr, timeout: Duration) -> io::Result<Socket> {
        let stream = TcpStream::connect_timeout(&addr, timeout)?;
        stream.set_nodelay(true)?;
        Ok(Box::new(stream))
    }
}

/// A scripted network stack for testing.
///
/// Everything written to sockets it hands out is collected in order and can
/// be inspected through [`MockNetwork::sent`].
#[derive(Debug, Clone)]
pub struct MockNetwork {
    pending_polls: Arc<AtomicU32>,
    available: bool,
    refuse_connect: bool,
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockNetwork {
    /// Creates a stack that is immediately available and accepts connections.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pending_polls: Arc::new(AtomicU32::new(0)),
            available: true,
            refuse_connect: false,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Reports the connectivity request as pending for `polls` checks.
    #[must_use]
    pub fn with_pending_polls(self, polls: u32) -> Self {
        self.pending_polls.store(polls, Ordering::SeqCst);
        self
    }

    /// Keeps the connectivity request pending forever.
    #[must_use]
    pub fn never_resolves(self) -> Self {
        self.with_pending_polls(u32::MAX)
    }

    /// Sets whether connectivity is granted.
    #[must_use]
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Makes every connect attempt fail.
    #[must_use]
    pub fn refusing_connections(mut self) -> Self {
        self.refuse_connect = true;
        self
    }

    /// Returns every buffer sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.sent.lock().clone()
    }
}

impl Default for MockNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkStack for MockNetwork {
    fn initialize(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn request_connectivity(&mut self) {}

    fn is_connectivity_pending(&self) -> bool {
        let remaining = self.pending_polls.load(Ordering::SeqCst);
        if remaining == u32::MAX {
            return true;
        }
        if remaining > 0 {
            self.pending_polls.fetch_sub(1, Ordering::SeqCst);
            return true;
        }
        false
    }

    fn is_connectivity_available(&self) -> bool {
        self.available
    }

    fn connect(&mut self, _addr: SocketAddr, _timeout: Duration) -> io::Result<Socket> {
        if self.refuse_connect {
            return Err(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "mock connection refused",
            ));
        }
        Ok(Box::new(MockSocket {
            sent: Arc::clone(&self.sent),
        }))
    }
}

struct MockSocket {
    sent: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl Write for MockSocket {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sent.lock().push(buf.to_vec());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_pending_counts_down() {
        let net = MockNetwork::new().with_pending_polls(2);
        assert!(net.is_connectivity_pending());
        assert!(net.is_connectivity_pending());
        assert!(!net.is_connectivity_pending());
    }

    #[test]
    fn mock_socket_records_writes() {
        let mut net = MockNetwork::new();
        let addr: SocketAddr = "127.0.0.1:1".parse().unwrap();
        let mut socket = net.connect(addr, Duration::from_millis(1)).unwrap();
        socket.write_all(b"ping").unwrap();
        assert_eq!(net.sent(), vec![b"ping".to_vec()]);
    }

    #[test]
    fn mock_refuses_when_configured() {
        let mut net = MockNetwork::new().refusing_connections();
        let addr: SocketAddr = "127.0.0.1:1".parse().unwrap();
        assert!(net.connect(addr, Duration::from_millis(1)).is_err());
    }
}
