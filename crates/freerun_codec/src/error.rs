//! Error types for the codec crate.

use freerun_storage::StorageError;
use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while building, serializing, or reading a document.
///
/// The builder variants (`KeyRequired` through `NotSealed`) are contract
/// violations by the caller: the builder is left unchanged when one is
/// returned.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The underlying stream failed.
    #[error("stream error: {0}")]
    Storage(#[from] StorageError),

    /// A value was added to a map without a key.
    #[error("map entries require a key")]
    KeyRequired,

    /// A key was supplied where none is allowed (array element or root).
    #[error("key {key:?} not allowed here")]
    KeyNotAllowed {
        /// The rejected key.
        key: String,
    },

    /// A map already contains an entry with this key.
    #[error("duplicate key {key:?}")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },

    /// A scalar was added with no container open.
    #[error("no open container")]
    NoOpenContainer,

    /// `end` was called with no container open.
    #[error("end called with no open container")]
    UnbalancedEnd,

    /// The root container is closed; the document accepts no more changes.
    #[error("document is sealed")]
    Sealed,

    /// Serialization was requested before the root container was closed.
    #[error("document is not sealed")]
    NotSealed,

    /// A key or string exceeds what its length prefix can describe.
    #[error("{what} too large: {len} bytes")]
    TooLarge {
        /// What was too large.
        what: &'static str,
        /// Its length in bytes.
        len: usize,
    },

    /// The input does not start with the expected format tag.
    #[error("invalid format tag {found:02x?}")]
    InvalidTag {
        /// The two bytes found.
        found: [u8; 2],
    },

    /// Invalid UTF-8 string.
    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    /// Unexpected end of input.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// Bytes remain after the payload.
    #[error("{count} trailing bytes after payload")]
    TrailingBytes {
        /// Number of unread bytes.
        count: usize,
    },

    /// The header describes an impossible tree.
    #[error("invalid document structure: {message}")]
    InvalidStructure {
        /// Description of the structural error.
        message: String,
    },
}

impl CodecError {
    /// Create an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }
}
