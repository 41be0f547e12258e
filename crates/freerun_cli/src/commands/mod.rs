//! CLI command implementations.

pub mod export;
pub mod inspect;

use freerun_codec::{Document, DocumentReader};
use freerun_storage::GrowableFileStore;
use std::path::Path;

/// Reads and decodes the document stored at `path`.
pub fn load_document(path: &Path) -> Result<Document, Box<dyn std::error::Error>> {
    let store = GrowableFileStore::new(path);
    if !store.exists() {
        return Err(format!("No recording found at {}", path.display()).into());
    }
    let size = usize::try_from(store.size()?)?;
    let bytes = store.read_at(0, size)?;
    tracing::debug!(path = %path.display(), size, "loaded recording");
    Ok(DocumentReader::new(&bytes).read()?)
}

#[cfg(test)]
pub(crate) mod testutil {
    use freerun_core::{Frame, RecorderConfig, RecordingSession, StopOutcome};
    use std::path::{Path, PathBuf};

    /// Records `positions` into `dir/run.frec` and returns the file path.
    pub fn write_recording(dir: &Path, positions: &[[f32; 3]]) -> PathBuf {
        let path = dir.join("run.frec");
        let mut session = RecordingSession::new(RecorderConfig::new().recording_path(&path));
        session.start_recording().unwrap();
        for &p in positions {
            session.record(Frame::new(p, [0.0; 3])).unwrap();
        }
        assert!(matches!(
            session.stop_recording().unwrap(),
            StopOutcome::Persisted(_)
        ));
        path
    }
}
