//! # Freerun Storage
//!
//! Byte streams and growable file storage for Freerun recordings.
//!
//! This crate provides the lowest-level storage abstraction for the
//! recorder. Streams and stores are **opaque byte sinks** - they do not
//! interpret the document format written through them.
//!
//! ## Design Principles
//!
//! - One [`Stream`] contract (read, write, skip, rewind, end-of-input,
//!   flush) over heterogeneous backends
//! - Streams have a fixed logical length and never grow storage
//! - Growth and durability belong to [`GrowableFileStore`]
//!
//! ## Available Backends
//!
//! - [`MemoryStream`] - Fixed-size owned buffer
//! - [`FileStream`] - Offset writes through a [`GrowableFileStore`]
//!
//! ## Example
//!
//! ```rust
//! use freerun_storage::{MemoryStream, Stream};
//!
//! let mut stream = MemoryStream::zeroed(11);
//! stream.write(b"hello world").unwrap();
//! stream.rewind();
//! let mut buf = [0u8; 5];
//! stream.read(&mut buf).unwrap();
//! assert_eq!(&buf, b"hello");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod file;
mod growable;
mod memory;
mod stream;

pub use error::{StorageError, StorageResult};
pub use file::FileStream;
pub use growable::GrowableFileStore;
pub use memory::MemoryStream;
pub use stream::{Stream, StreamOp, StreamTrace, TraceHook};
