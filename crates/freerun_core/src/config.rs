//! Recorder configuration.

use std::path::PathBuf;

/// Default recording file, relative to the working directory.
pub const DEFAULT_RECORDING_PATH: &str = "koopafreerun.frec";

/// Default value of the `HackName` entry.
pub const DEFAULT_HACK_NAME: &str = "null";

/// How a finished recording reaches the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistMode {
    /// Serialize into a scratch buffer, then write it in one call.
    #[default]
    Buffered,
    /// Serialize straight to the file at increasing offsets.
    Streaming,
}

/// Configuration for a [`RecordingSession`](crate::RecordingSession).
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Where the recording is written. Truncated on every start.
    pub recording_path: PathBuf,

    /// How the document is persisted on stop.
    pub persist_mode: PersistMode,

    /// Largest scratch buffer `Buffered` mode may take (`None` = unbounded).
    pub scratch_limit: Option<usize>,

    /// Value written under `HackName`.
    pub hack_name: String,

    /// Whether each stream transfer is reported to the diagnostic logger.
    pub trace_writes: bool,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            recording_path: PathBuf::from(DEFAULT_RECORDING_PATH),
            persist_mode: PersistMode::Buffered,
            scratch_limit: None,
            hack_name: DEFAULT_HACK_NAME.to_string(),
            trace_writes: false,
        }
    }
}

impl RecorderConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recording path.
    #[must_use]
    pub fn recording_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.recording_path = path.into();
        self
    }

    /// Sets the persist mode.
    #[must_use]
    pub const fn persist_mode(mut self, mode: PersistMode) -> Self {
        self.persist_mode = mode;
        self
    }

    /// Caps the scratch buffer used by [`PersistMode::Buffered`].
    #[must_use]
    pub const fn scratch_limit(mut self, limit: usize) -> Self {
        self.scratch_limit = Some(limit);
        self
    }

    /// Sets the `HackName` value.
    #[must_use]
    pub fn hack_name(mut self, name: impl Into<String>) -> Self {
        self.hack_name = name.into();
        self
    }

    /// Sets whether stream transfers are traced.
    #[must_use]
    pub const fn trace_writes(mut self, value: bool) -> Self {
        self.trace_writes = value;
        self
    }
}
