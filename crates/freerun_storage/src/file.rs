//! File-backed stream for writing straight into persistent storage.

use crate::error::{StorageError, StorageResult};
use crate::growable::GrowableFileStore;
use crate::stream::{displace, fits, Stream, StreamOp, StreamTrace, TraceHook};

/// A stream whose reads and writes go to a [`GrowableFileStore`].
///
/// Every write is forwarded to [`GrowableFileStore::write_at`] at the
/// stream cursor, which extends and syncs the file per call. The stream
/// itself buffers nothing, so [`flush`](Stream::flush) has no work to do.
///
/// # Example
///
/// ```no_run
/// use freerun_storage::{FileStream, GrowableFileStore, Stream};
///
/// let store = GrowableFileStore::new("recording.frec");
/// let mut stream = FileStream::new(store, 8);
/// stream.write(b"abcd").unwrap();
/// stream.write(b"efgh").unwrap();
/// assert!(stream.end_of_input());
/// ```
pub struct FileStream {
    store: GrowableFileStore,
    len: u64,
    cursor: u64,
    trace: Option<TraceHook>,
}

impl FileStream {
    /// Creates a stream of logical length `len` over `store`.
    #[must_use]
    pub fn new(store: GrowableFileStore, len: u64) -> Self {
        Self {
            store,
            len,
            cursor: 0,
            trace: None,
        }
    }

    /// Installs a hook that observes every read and write.
    pub fn set_trace_hook(&mut self, hook: TraceHook) {
        self.trace = Some(hook);
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &GrowableFileStore {
        &self.store
    }

    fn emit(&mut self, op: StreamOp, len: usize) {
        if let Some(hook) = self.trace.as_mut() {
            hook(&StreamTrace {
                op,
                offset: self.cursor,
                len,
            });
        }
    }
}

impl std::fmt::Debug for FileStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStream")
            .field("path", &self.store.path())
            .field("len", &self.len)
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl Stream for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> StorageResult<usize> {
        if !fits(self.cursor, buf.len(), self.len) {
            return Err(StorageError::ReadPastEnd {
                offset: self.cursor,
                len: buf.len(),
                size: self.len,
            });
        }

        let data = self.store.read_at(self.cursor, buf.len())?;
        buf.copy_from_slice(&data);
        self.emit(StreamOp::Read, buf.len());
        self.cursor += buf.len() as u64;
        Ok(buf.len())
    }

    fn write(&mut self, data: &[u8]) -> StorageResult<usize> {
        if !fits(self.cursor, data.len(), self.len) {
            return Err(StorageError::WritePastEnd {
                offset: self.cursor,
                len: data.len(),
                limit: self.len,
            });
        }

        self.store.write_at(self.cursor, data)?;
        self.emit(StreamOp::Write, data.len());
        self.cursor += data.len() as u64;
        Ok(data.len())
    }

    fn skip(&mut self, delta: i64) -> StorageResult<i64> {
        self.cursor = displace(self.cursor, delta)?;
        Ok(delta)
    }

    fn rewind(&mut self) {
        self.cursor = 0;
    }

    fn end_of_input(&self) -> bool {
        self.cursor >= self.len
    }

    fn flush(&mut self) -> StorageResult<()> {
        // The store syncs on every write
        Ok(())
    }

    fn position(&self) -> u64 {
        self.cursor
    }

    fn len(&self) -> u64 {
        self.len
    }
}
