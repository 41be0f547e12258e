//! Recording session state machine.
//!
//! ```text
//!            start_recording             stop_recording
//!   Idle ─────────────────────▶ Recording ──────────────▶ Idle
//!     ▲                            │  record_frame (×N)
//!     └── start fails: stays Idle  └──────────┘
//! ```
//!
//! Calls that do not fit the current state (`start` while recording,
//! `record`/`stop` while idle) are logged no-ops.

use crate::config::{PersistMode, RecorderConfig};
use crate::error::{CoreError, CoreResult};
use crate::frame::Frame;
use crate::pose::PoseSource;
use crate::schema;
use freerun_codec::{DocumentBuilder, FORMAT_TAG};
use freerun_diag::{diag_log, DiagnosticLogger};
use freerun_storage::{FileStream, GrowableFileStore, MemoryStream, StreamTrace, TraceHook};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Whether a session is capturing frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No capture in progress.
    Idle,
    /// Frames are being appended.
    Recording,
}

/// What a successful stop wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingSummary {
    /// File the recording was written to.
    pub path: PathBuf,
    /// Frames in the recording.
    pub frames: usize,
    /// Bytes in the header region.
    pub header_bytes: u64,
    /// Bytes in the payload region.
    pub payload_bytes: u64,
}

impl RecordingSummary {
    /// Size of the written file.
    #[must_use]
    pub const fn total_bytes(&self) -> u64 {
        self.header_bytes + self.payload_bytes
    }
}

/// Result of [`RecordingSession::stop_recording`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// The session was idle; nothing happened.
    NotRecording,
    /// The document was written to disk.
    Persisted(RecordingSummary),
    /// The scratch buffer could not be obtained. Nothing was written and
    /// the captured frames are gone.
    Discarded {
        /// Frames that were lost.
        frames: usize,
        /// Scratch bytes that were requested.
        requested: u64,
    },
}

#[derive(Debug)]
struct Capture {
    document: DocumentBuilder,
    frames: usize,
}

/// Captures per-frame pose samples and persists them as one document.
///
/// The session is driven from a single update loop: the host calls
/// [`record_frame`](Self::record_frame) once per tick between
/// [`start_recording`](Self::start_recording) and
/// [`stop_recording`](Self::stop_recording).
///
/// # Example
///
/// ```rust
/// use freerun_core::{RecorderConfig, RecordingSession, StaticPose, StopOutcome};
/// use glam::Vec3;
///
/// let dir = tempfile::tempdir().unwrap();
/// let config = RecorderConfig::new().recording_path(dir.path().join("run.frec"));
/// let mut session = RecordingSession::new(config);
///
/// session.start_recording().unwrap();
/// session.record_frame(&StaticPose::at(Vec3::new(1.0, 2.0, 3.0))).unwrap();
///
/// match session.stop_recording().unwrap() {
///     StopOutcome::Persisted(summary) => assert_eq!(summary.frames, 1),
///     other => panic!("unexpected outcome: {other:?}"),
/// }
/// ```
#[derive(Debug)]
pub struct RecordingSession {
    config: RecorderConfig,
    store: GrowableFileStore,
    logger: Option<Arc<DiagnosticLogger>>,
    capture: Option<Capture>,
}

impl RecordingSession {
    /// Creates an idle session.
    #[must_use]
    pub fn new(config: RecorderConfig) -> Self {
        let store = GrowableFileStore::new(config.recording_path.clone());
        Self {
            config,
            store,
            logger: None,
            capture: None,
        }
    }

    /// Attaches a diagnostic logger for progress and write traces.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<DiagnosticLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Gets the configuration.
    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Gets the current state.
    pub fn state(&self) -> SessionState {
        if self.capture.is_some() {
            SessionState::Recording
        } else {
            SessionState::Idle
        }
    }

    /// Returns true between a successful start and the next stop.
    pub fn is_recording(&self) -> bool {
        self.capture.is_some()
    }

    /// Frames captured so far (0 when idle).
    pub fn frame_count(&self) -> usize {
        self.capture.as_ref().map_or(0, |c| c.frames)
    }

    /// Starts a new recording.
    ///
    /// Any existing file at the recording path is replaced by one holding
    /// only the format tag, then a fresh document is opened with the lookup
    /// tables and an empty `DataArray`. Does nothing if already recording.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the old file cannot be deleted or the new
    /// one cannot be created; the session stays idle.
    pub fn start_recording(&mut self) -> CoreResult<()> {
        if let Err(e) = self.expect_state(SessionState::Idle) {
            debug!(error = %e, "start_recording ignored");
            return Ok(());
        }

        self.store.delete_if_exists()?;
        // Claims the target now so an unwritable path fails before capture.
        self.store.write_at(0, &FORMAT_TAG)?;

        let mut document = DocumentBuilder::new();
        schema::write_preamble(&mut document, &self.config.hack_name)?;
        self.capture = Some(Capture {
            document,
            frames: 0,
        });

        info!(path = %self.store.path().display(), "recording started");
        if let Some(logger) = &self.logger {
            diag_log!(logger, "recording started: {}", self.store.path().display());
        }
        Ok(())
    }

    /// Samples `pose` and appends it as the next frame.
    ///
    /// Does nothing unless recording.
    pub fn record_frame<P: PoseSource + ?Sized>(&mut self, pose: &P) -> CoreResult<()> {
        if !self.is_recording() {
            trace!("record_frame ignored: not recording");
            return Ok(());
        }
        self.record(Frame::from_pose(pose.translation(), pose.orientation()))
    }

    /// Appends an already sampled frame.
    ///
    /// Does nothing unless recording.
    pub fn record(&mut self, frame: Frame) -> CoreResult<()> {
        let Some(capture) = self.capture.as_mut() else {
            trace!("record ignored: not recording");
            return Ok(());
        };
        frame.append_to(&mut capture.document)?;
        capture.frames += 1;
        trace!(frame = capture.frames, "frame recorded");
        Ok(())
    }

    /// Finishes the recording and writes it to disk.
    ///
    /// The session is idle afterwards whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the file cannot be created or written.
    /// A scratch allocation failure is not an error; it is reported as
    /// [`StopOutcome::Discarded`].
    pub fn stop_recording(&mut self) -> CoreResult<StopOutcome> {
        let Some(Capture {
            mut document,
            frames,
        }) = self.capture.take()
        else {
            debug!("stop_recording ignored: not recording");
            return Ok(StopOutcome::NotRecording);
        };

        // DataArray, then the root.
        document.end()?;
        document.end()?;

        let header_bytes = document.header_size();
        let payload_bytes = document.payload_size();
        let total = header_bytes + payload_bytes;
        debug!(frames, header_bytes, payload_bytes, mode = ?self.config.persist_mode, "persisting recording");

        match self.config.persist_mode {
            PersistMode::Buffered => {
                let buffer = match self.scratch_buffer(total) {
                    Ok(buffer) => buffer,
                    Err(e) => {
                        warn!(error = %e, frames, "recording discarded");
                        if let Err(cleanup) = self.store.delete_if_exists() {
                            warn!(error = %cleanup, "could not remove placeholder file");
                        }
                        if let Some(logger) = &self.logger {
                            diag_log!(logger, "recording discarded: {e}");
                        }
                        return Ok(StopOutcome::Discarded {
                            frames,
                            requested: total,
                        });
                    }
                };
                let mut stream = MemoryStream::new(buffer);
                if let Some(hook) = self.trace_hook() {
                    stream.set_trace_hook(hook);
                }
                document.serialize(&mut stream)?;
                self.store.write_at(0, stream.as_bytes())?;
            }
            PersistMode::Streaming => {
                let mut stream = FileStream::new(self.store.clone(), total);
                if let Some(hook) = self.trace_hook() {
                    stream.set_trace_hook(hook);
                }
                document.serialize(&mut stream)?;
            }
        }

        let summary = RecordingSummary {
            path: self.store.path().to_path_buf(),
            frames,
            header_bytes,
            payload_bytes,
        };
        info!(path = %summary.path.display(), frames, bytes = total, "recording saved");
        if let Some(logger) = &self.logger {
            diag_log!(logger, "recording saved: {frames} frames, {total} bytes");
        }
        Ok(StopOutcome::Persisted(summary))
    }

    fn expect_state(&self, expected: SessionState) -> CoreResult<()> {
        let state = self.state();
        if state == expected {
            Ok(())
        } else {
            Err(CoreError::precondition(format!(
                "expected {expected:?}, session is {state:?}"
            )))
        }
    }

    /// Obtains a zeroed buffer of exactly `size` bytes, or fails without
    /// aborting.
    fn scratch_buffer(&self, size: u64) -> CoreResult<Vec<u8>> {
        let failed = || CoreError::AllocationFailure { requested: size };
        let len = usize::try_from(size).map_err(|_| failed())?;
        if self.config.scratch_limit.is_some_and(|limit| len > limit) {
            return Err(failed());
        }

        let mut buffer = Vec::new();
        buffer.try_reserve_exact(len).map_err(|_| failed())?;
        buffer.resize(len, 0);
        Ok(buffer)
    }

    fn trace_hook(&self) -> Option<TraceHook> {
        if !self.config.trace_writes {
            return None;
        }
        let logger = Arc::clone(self.logger.as_ref()?);
        Some(Box::new(move |t: &StreamTrace| {
            diag_log!(logger, "{:?} {} bytes at {}", t.op, t.len, t.offset);
        }))
    }
}
