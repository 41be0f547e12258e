//! Error types for the diagnostic logger.

use crate::logger::LoggerState;
use std::io;
use thiserror::Error;

/// Result type for logger operations.
pub type DiagResult<T> = Result<T, DiagError>;

/// Errors that can occur while bringing the logger up.
///
/// Once initialized, logging itself never fails: send errors are dropped.
#[derive(Error, Debug)]
pub enum DiagError {
    /// `init` was called on a logger that already left `Uninitialized`.
    #[error("logger already initialized (state {state:?})")]
    AlreadyInitialized {
        /// State at the time of the call.
        state: LoggerState,
    },

    /// The network stack reported no connectivity.
    #[error("network unavailable: {reason}")]
    NetworkUnavailable {
        /// Why the network is considered unavailable.
        reason: String,
    },

    /// The configured address is not an IP literal.
    #[error("invalid address: {address}")]
    InvalidAddress {
        /// The address as configured.
        address: String,
    },

    /// Opening or connecting the socket failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] io::Error),

    /// The connectivity wait was cancelled.
    #[error("initialization cancelled")]
    Cancelled,
}
