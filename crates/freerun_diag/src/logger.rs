//! Diagnostic logger state machine.

use crate::config::LoggerConfig;
use crate::error::{DiagError, DiagResult};
use crate::network::{NetworkStack, Socket};
use parking_lot::Mutex;
use std::fmt;
use std::io::Write;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Size of the message buffer; every send transmits exactly this many bytes.
pub const LOG_BUFFER_SIZE: usize = 0x500;

/// The lifecycle state of the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerState {
    /// `init` has not been called.
    Uninitialized,
    /// The network was not available; logging is disabled.
    Unavailable,
    /// The network was available but the connection failed.
    Disconnected,
    /// Messages are being sent.
    Connected,
}

struct Inner {
    state: LoggerState,
    socket: Option<Socket>,
}

/// A best-effort sink that sends formatted messages to a TCP collector.
///
/// The logger is fire-and-forget: there is no retry, no backpressure, and no
/// delivery guarantee. Each message is rendered into a zeroed
/// [`LOG_BUFFER_SIZE`]-byte buffer, truncated silently if it does not fit,
/// and the whole buffer is sent in one write.
///
/// The logger is meant to be created once by the host and shared by `Arc`.
///
/// # Example
///
/// ```rust
/// use freerun_diag::{diag_log, DiagnosticLogger, LoggerConfig, LoggerState, MockNetwork};
///
/// let logger = DiagnosticLogger::new(LoggerConfig::default());
/// let mut net = MockNetwork::new();
/// logger.init(&mut net).unwrap();
/// assert_eq!(logger.state(), LoggerState::Connected);
///
/// diag_log!(logger, "frame {}", 3);
/// assert_eq!(net.sent().len(), 1);
/// ```
pub struct DiagnosticLogger {
    config: LoggerConfig,
    inner: Mutex<Inner>,
    started: AtomicBool,
    cancelled: AtomicBool,
}

impl DiagnosticLogger {
    /// Creates an uninitialized logger.
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(Inner {
                state: LoggerState::Uninitialized,
                socket: None,
            }),
            started: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Gets the current state.
    pub fn state(&self) -> LoggerState {
        self.inner.lock().state
    }

    /// Returns true if messages will be sent.
    pub fn is_connected(&self) -> bool {
        self.state() == LoggerState::Connected
    }

    /// Gets the configuration.
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Aborts a connectivity wait in progress.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Brings the network up and connects to the collector.
    ///
    /// Waits for the connectivity request to resolve, bounded by
    /// `connect_timeout` and by [`cancel`](Self::cancel). The state lock is
    /// not held while waiting, so `state` and `log` stay responsive.
    ///
    /// # Errors
    ///
    /// - `AlreadyInitialized` if `init` was called before
    /// - `NetworkUnavailable` / `Cancelled` → state `Unavailable`
    /// - `InvalidAddress` / `ConnectFailed` → state `Disconnected`
    pub fn init(&self, net: &mut dyn NetworkStack) -> DiagResult<()> {
        if self
            .started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(DiagError::AlreadyInitialized {
                state: self.state(),
            });
        }

        let result = self.connect(net);
        let mut inner = self.inner.lock();
        match result {
            Ok(socket) => {
                inner.state = LoggerState::Connected;
                inner.socket = Some(socket);
                info!(address = %self.config.address, port = self.config.port, "diagnostic logger connected");
                Ok(())
            }
            Err(e) => {
                inner.state = match e {
                    DiagError::InvalidAddress { .. } | DiagError::ConnectFailed(_) => {
                        LoggerState::Disconnected
                    }
                    _ => LoggerState::Unavailable,
                };
                warn!(state = ?inner.state, error = %e, "diagnostic logger disabled");
                Err(e)
            }
        }
    }

    fn connect(&self, net: &mut dyn NetworkStack) -> DiagResult<Socket> {
        net.initialize().map_err(|e| DiagError::NetworkUnavailable {
            reason: e.to_string(),
        })?;
        net.request_connectivity();

        let deadline = Instant::now() + self.config.connect_timeout;
        while net.is_connectivity_pending() {
            if self.cancelled.load(Ordering::SeqCst) {
                return Err(DiagError::Cancelled);
            }
            if Instant::now() >= deadline {
                return Err(DiagError::NetworkUnavailable {
                    reason: format!(
                        "connectivity request unresolved after {:?}",
                        self.config.connect_timeout
                    ),
                });
            }
            thread::sleep(self.config.poll_interval);
        }

        if !net.is_connectivity_available() {
            return Err(DiagError::NetworkUnavailable {
                reason: "connectivity request denied".to_string(),
            });
        }

        let ip: IpAddr = self
            .config
            .address
            .parse()
            .map_err(|_| DiagError::InvalidAddress {
                address: self.config.address.clone(),
            })?;
        let addr = SocketAddr::new(ip, self.config.port);
        debug!(%addr, "connecting diagnostic logger");

        net.connect(addr, self.config.connect_timeout)
            .map_err(DiagError::ConnectFailed)
    }

    /// Sends one formatted message. Does nothing unless connected.
    ///
    /// Prefer the [`diag_log!`](crate::diag_log) macro.
    pub fn log(&self, args: fmt::Arguments<'_>) {
        let mut inner = self.inner.lock();
        if inner.state != LoggerState::Connected {
            return;
        }
        let Some(socket) = inner.socket.as_mut() else {
            return;
        };

        let mut buffer = [0u8; LOG_BUFFER_SIZE];
        if render(&mut buffer, args) == 0 {
            return;
        }

        // Best effort: a lost message is not worth surfacing.
        let _ = socket.write_all(&buffer);
    }
}

impl fmt::Debug for DiagnosticLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticLogger")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

/// Formats `args` into `buffer`, returning the number of bytes written.
///
/// The last byte is never written so the buffer stays NUL-terminated.
fn render(buffer: &mut [u8], args: fmt::Arguments<'_>) -> usize {
    struct Truncating<'a> {
        buf: &'a mut [u8],
        len: usize,
    }

    impl fmt::Write for Truncating<'_> {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            let room = self.buf.len() - self.len;
            let n = room.min(s.len());
            self.buf[self.len..self.len + n].copy_from_slice(&s.as_bytes()[..n]);
            self.len += n;
            Ok(())
        }
    }

    let limit = buffer.len().saturating_sub(1);
    let mut out = Truncating {
        buf: &mut buffer[..limit],
        len: 0,
    };
    let _ = fmt::write(&mut out, args);
    out.len
}

/// Sends a formatted message through a [`DiagnosticLogger`].
///
/// ```rust
/// use freerun_diag::{diag_log, DiagnosticLogger, LoggerConfig};
///
/// let logger = DiagnosticLogger::new(LoggerConfig::default());
/// // Not initialized: silently dropped.
/// diag_log!(logger, "wrote {} bytes at {}", 40, 1024);
/// ```
#[macro_export]
macro_rules! diag_log {
    ($logger:expr, $($arg:tt)*) => {
        $logger.log(::std::format_args!($($arg)*))
    };
}
