//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The target path exists but cannot hold file data.
    #[error("invalid target: {} is a directory", path.display())]
    InvalidTarget {
        /// The offending path.
        path: PathBuf,
    },

    /// Attempted to read beyond the end of storage.
    #[error("read beyond end of storage: offset {offset}, len {len}, size {size}")]
    ReadPastEnd {
        /// The requested read offset.
        offset: u64,
        /// The requested read length.
        len: usize,
        /// The current storage size.
        size: u64,
    },

    /// Attempted to write beyond the logical length of a stream.
    #[error("write beyond end of stream: offset {offset}, len {len}, limit {limit}")]
    WritePastEnd {
        /// The cursor at which the write was attempted.
        offset: u64,
        /// The requested write length.
        len: usize,
        /// The logical length of the stream.
        limit: u64,
    },

    /// A cursor move would land before the start of the stream.
    #[error("seek out of range: cursor {cursor}, delta {delta}")]
    SeekOutOfRange {
        /// The cursor before the move.
        cursor: u64,
        /// The requested displacement.
        delta: i64,
    },

    /// A memory stream was given a buffer smaller than its logical length.
    #[error("buffer too small: capacity {capacity}, logical length {len}")]
    BufferTooSmall {
        /// Length of the supplied buffer.
        capacity: usize,
        /// Requested logical length.
        len: u64,
    },
}
