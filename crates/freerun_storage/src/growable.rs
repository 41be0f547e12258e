//! Offset-addressed file storage that grows on demand.

use crate::error::{StorageError, StorageResult};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A named file that can always accept a write at any offset.
///
/// Each [`write_at`](Self::write_at) call is self-contained: it creates the
/// file if needed, extends it to cover the write, writes, syncs, and closes
/// the handle before returning. No handle is held between calls.
///
/// The same primitive serves two persistence styles:
/// - incremental appends with monotonically increasing offsets
/// - a single write of a fully serialized buffer at offset 0
///
/// # Durability
///
/// Data is passed to `File::sync_data` before `write_at` returns.
///
/// # Example
///
/// ```no_run
/// use freerun_storage::GrowableFileStore;
///
/// let store = GrowableFileStore::new("recording.frec");
/// store.delete_if_exists().unwrap();
/// store.write_at(0, b"header").unwrap();
/// store.write_at(6, b"payload").unwrap();
/// assert_eq!(store.size().unwrap(), 13);
/// ```
#[derive(Debug, Clone)]
pub struct GrowableFileStore {
    path: PathBuf,
}

impl GrowableFileStore {
    /// Creates a store for the file at `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `data` at `offset`, creating or enlarging the file first.
    ///
    /// The file is never shrunk: if it is already longer than
    /// `offset + data.len()` the trailing bytes are left in place.
    ///
    /// # Errors
    ///
    /// - `InvalidTarget` if the path is a directory
    /// - `Io` if the file cannot be created, opened, resized, or written
    pub fn write_at(&self, offset: u64, data: &[u8]) -> StorageResult<()> {
        let required = offset.checked_add(data.len() as u64).ok_or_else(|| {
            StorageError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("write of {} bytes at offset {offset} overflows", data.len()),
            ))
        })?;

        match fs::metadata(&self.path) {
            Ok(meta) if meta.is_dir() => return Err(self.invalid_target()),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let file = File::create(&self.path)?;
                file.set_len(required)?;
                debug!(path = %self.path.display(), size = required, "created file");
            }
            Err(e) => return Err(e.into()),
        }

        // Positioned writes only: O_APPEND would force every write to EOF.
        let mut file = OpenOptions::new().read(true).write(true).open(&self.path)?;

        let size = file.metadata()?.len();
        if size < required {
            file.set_len(required)?;
            debug!(path = %self.path.display(), from = size, to = required, "grew file");
        }

        file.seek(SeekFrom::Start(offset))?;
        file.write_all(data)?;
        file.sync_data()?;

        Ok(())
    }

    /// Reads `len` bytes at `offset`.
    ///
    /// # Errors
    ///
    /// Returns `ReadPastEnd` if the range extends beyond the file (a missing
    /// file has size 0), or `Io` on read failure.
    pub fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let size = self.size()?;
        let end = offset.saturating_add(len as u64);

        if offset > size || end > size {
            return Err(StorageError::ReadPastEnd { offset, len, size });
        }

        if len == 0 {
            return Ok(Vec::new());
        }

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;

        let mut buffer = vec![0u8; len];
        file.read_exact(&mut buffer)?;

        Ok(buffer)
    }

    /// Returns the current file size, or 0 if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTarget` for a directory, or `Io` if metadata cannot
    /// be read.
    pub fn size(&self) -> StorageResult<u64> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.is_dir() => Err(self.invalid_target()),
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns true if a regular file exists at the path.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Removes the file. A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTarget` for a directory, or `Io` if removal fails.
    pub fn delete_if_exists(&self) -> StorageResult<()> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.is_dir() => Err(self.invalid_target()),
            Ok(_) => {
                fs::remove_file(&self.path)?;
                debug!(path = %self.path.display(), "deleted previous file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn invalid_target(&self) -> StorageError {
        StorageError::InvalidTarget {
            path: self.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn growable_write_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rec.frec");
        let store = GrowableFileStore::new(&path);

        store.write_at(0, b"hello").unwrap();
        assert!(path.exists());
        assert_eq!(fs::read(&path).unwrap(), b"hello");
    }

    #[test]
    fn growable_write_at_offset_zero_fills_gap() {
        let dir = tempdir().unwrap();
        let store = GrowableFileStore::new(dir.path().join("rec.frec"));

        store.write_at(4, b"xy").unwrap();
        assert_eq!(store.size().unwrap(), 6);
        assert_eq!(store.read_at(0, 6).unwrap(), b"\0\0\0\0xy");
    }

    #[test]
    fn growable_incremental_appends() {
        let dir = tempdir().unwrap();
        let store = GrowableFileStore::new(dir.path().join("rec.frec"));

        let mut offset = 0u64;
        for chunk in [&b"one "[..], b"two ", b"three"] {
            store.write_at(offset, chunk).unwrap();
            offset += chunk.len() as u64;
        }

        assert_eq!(store.read_at(0, offset as usize).unwrap(), b"one two three");
    }

    #[test]
    fn growable_never_shrinks() {
        let dir = tempdir().unwrap();
        let store = GrowableFileStore::new(dir.path().join("rec.frec"));

        store.write_at(0, b"0123456789").unwrap();
        store.write_at(2, b"ab").unwrap();

        assert_eq!(store.size().unwrap(), 10);
        assert_eq!(store.read_at(0, 10).unwrap(), b"01ab456789");
    }

    #[test]
    fn growable_directory_is_invalid_target() {
        let dir = tempdir().unwrap();
        let store = GrowableFileStore::new(dir.path());

        let result = store.write_at(0, b"data");
        assert!(matches!(result, Err(StorageError::InvalidTarget { .. })));
        assert!(matches!(
            store.delete_if_exists(),
            Err(StorageError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn growable_delete_if_exists() {
        let dir = tempdir().unwrap();
        let store = GrowableFileStore::new(dir.path().join("rec.frec"));

        // Missing file is fine
        store.delete_if_exists().unwrap();

        store.write_at(0, b"old run").unwrap();
        assert!(store.exists());
        store.delete_if_exists().unwrap();
        assert!(!store.exists());
        assert_eq!(store.size().unwrap(), 0);
    }

    #[test]
    fn growable_read_past_end_fails() {
        let dir = tempdir().unwrap();
        let store = GrowableFileStore::new(dir.path().join("rec.frec"));
        store.write_at(0, b"abc").unwrap();

        let result = store.read_at(2, 5);
        assert!(matches!(result, Err(StorageError::ReadPastEnd { .. })));
    }

    #[test]
    fn growable_missing_parent_fails() {
        let dir = tempdir().unwrap();
        let store = GrowableFileStore::new(dir.path().join("missing").join("rec.frec"));

        assert!(matches!(store.write_at(0, b"x"), Err(StorageError::Io(_))));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn write_lands_at_offset(
                off in 0u64..4096,
                data in proptest::collection::vec(any::<u8>(), 1..256),
                later in 0u64..4096,
            ) {
                let dir = tempdir().unwrap();
                let store = GrowableFileStore::new(dir.path().join("p.frec"));

                store.write_at(off, &data).unwrap();
                let end = off + data.len() as u64;
                prop_assert!(store.size().unwrap() >= end);
                prop_assert_eq!(store.read_at(off, data.len()).unwrap(), data.clone());

                let before = store.size().unwrap();
                store.write_at(off + later, b"z").unwrap();
                prop_assert!(store.size().unwrap() >= before);
            }
        }
    }
}
