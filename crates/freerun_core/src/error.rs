//! Error types for Freerun core.

use freerun_codec::CodecError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while recording or reading back a recording.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] freerun_storage::StorageError),

    /// Document codec error.
    #[error("codec error: {0}")]
    Codec(#[source] CodecError),

    /// An operation was invoked in a state that does not accept it.
    ///
    /// The session absorbs these as logged no-ops; they are never
    /// returned from its public operations.
    #[error("precondition violated: {message}")]
    PreconditionViolation {
        /// What was expected.
        message: String,
    },

    /// The scratch buffer for a finished recording could not be obtained.
    #[error("could not allocate {requested} bytes of scratch space")]
    AllocationFailure {
        /// Bytes requested.
        requested: u64,
    },

    /// A decoded document does not have the recording shape.
    #[error("invalid recording: {message}")]
    InvalidRecording {
        /// Description of what is wrong.
        message: String,
    },
}

impl CoreError {
    /// Creates a precondition violation error.
    pub fn precondition(message: impl Into<String>) -> Self {
        Self::PreconditionViolation {
            message: message.into(),
        }
    }

    /// Creates an invalid recording error.
    pub fn invalid_recording(message: impl Into<String>) -> Self {
        Self::InvalidRecording {
            message: message.into(),
        }
    }
}

/// Stream failures raised while serializing are storage errors, not codec
/// errors.
impl From<CodecError> for CoreError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Storage(inner) => Self::Storage(inner),
            other => Self::Codec(other),
        }
    }
}
