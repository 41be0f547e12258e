//! # Freerun Core
//!
//! Records an actor's pose once per frame and persists the run as a single
//! binary document.
//!
//! This crate provides:
//! - [`RecordingSession`] - the Idle/Recording state machine
//! - [`Frame`] - one sampled pose, flattened to ten scalars
//! - [`Recording`] - a persisted run read back from disk
//! - [`to_text`] - a human-readable view of a recording
//!
//! ## Document shape
//!
//! ```text
//! { HackName, MaterialCode[5], ActionName[11], ActionNameCap[3],
//!   DataArray: [[x, y, z, roll, pitch, yaw, !l id, frame, !l 0, !l 0], ...] }
//! ```
//!
//! Storage comes from `freerun_storage`, encoding from `freerun_codec`, and
//! optional progress messages go through `freerun_diag`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod export;
mod frame;
mod pose;
mod recording;
pub mod schema;
mod session;

pub use config::{PersistMode, RecorderConfig, DEFAULT_HACK_NAME, DEFAULT_RECORDING_PATH};
pub use error::{CoreError, CoreResult};
pub use export::{to_text, TextExport};
pub use frame::{
    Frame, FRAME_FIELD_COUNT, PLACEHOLDER_ANIMATION_FRAME, PLACEHOLDER_ANIMATION_ID,
};
pub use pose::{PoseSource, StaticPose};
pub use recording::Recording;
pub use session::{RecordingSession, RecordingSummary, SessionState, StopOutcome};

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
