//! # Freerun Diagnostics
//!
//! A best-effort network sink for trace messages during development.
//!
//! This crate provides:
//! - [`DiagnosticLogger`] - connect once, then fire-and-forget messages
//! - [`NetworkStack`] - the network services the logger relies on, with a
//!   TCP implementation and a scripted mock
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──init──▶ Connected
//!                   ├───▶ Disconnected   (bad address or connect failure)
//!                   └───▶ Unavailable    (no connectivity, timeout, cancel)
//! ```
//!
//! Only `Connected` sends anything. The logger is independent of recording
//! durability: a lost diagnostic never affects persisted data.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod logger;
mod network;

pub use config::LoggerConfig;
pub use error::{DiagError, DiagResult};
pub use logger::{DiagnosticLogger, LoggerState, LOG_BUFFER_SIZE};
pub use network::{MockNetwork, NetworkStack, Socket, TcpNetwork};
