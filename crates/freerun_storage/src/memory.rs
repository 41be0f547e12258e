//! In-memory stream over a fixed-size buffer.

use crate::error::{StorageError, StorageResult};
use crate::stream::{displace, fits, Stream, StreamOp, StreamTrace, TraceHook};

/// A stream over an owned, contiguous buffer.
///
/// The buffer is sized once at construction and never reallocated. This is
/// the scratch target for single-shot persistence: serialize into memory,
/// then hand the whole buffer to the file store in one write.
///
/// # Example
///
/// ```rust
/// use freerun_storage::{MemoryStream, Stream};
///
/// let mut stream = MemoryStream::zeroed(4);
/// stream.write(b"ab").unwrap();
/// stream.write(b"cd").unwrap();
/// assert!(stream.end_of_input());
/// assert_eq!(stream.into_inner(), b"abcd");
/// ```
pub struct MemoryStream {
    data: Vec<u8>,
    len: u64,
    cursor: u64,
    trace: Option<TraceHook>,
}

impl MemoryStream {
    /// Creates a stream whose logical length equals the buffer length.
    #[must_use]
    pub fn new(data: Vec<u8>) -> Self {
        let len = data.len() as u64;
        Self {
            data,
            len,
            cursor: 0,
            trace: None,
        }
    }

    /// Creates a stream over a zero-filled buffer of `len` bytes.
    #[must_use]
    pub fn zeroed(len: usize) -> Self {
        Self::new(vec![0u8; len])
    }

    /// Creates a stream with a logical length shorter than its buffer.
    ///
    /// # Errors
    ///
    /// Returns `BufferTooSmall` if `data` cannot hold `len` bytes.
    pub fn with_len(data: Vec<u8>, len: u64) -> StorageResult<Self> {
        if (data.len() as u64) < len {
            return Err(StorageError::BufferTooSmall {
                capacity: data.len(),
                len,
            });
        }
        Ok(Self {
            data,
            len,
            cursor: 0,
            trace: None,
        })
    }

    /// Installs a hook that observes every read and write.
    pub fn set_trace_hook(&mut self, hook: TraceHook) {
        self.trace = Some(hook);
    }

    /// Returns the whole backing buffer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the stream and returns the backing buffer.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.data
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

impl std::fmt::Debug for MemoryStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStream")
            .field("capacity", &self.data.len())
            .field("len", &self.len)
            .field("cursor", &self.cursor)
            .field("traced", &self.trace.is_some())
            .finish()
    }
}

impl Stream for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> StorageResult<usize> {
        if !fits(self.cursor, buf.len(), self.len) {
            return Err(StorageError::ReadPastEnd {
                offset: self.cursor,
                len: buf.len(),
                size: self.len,
            });
        }

        let start = self.cursor as usize;
        buf.copy_from_slice(&self.data[start..start + buf.len()]);
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

        let start = self.cursor as usize;
        self.data[start..start + data.len()].copy_from_slice(data);
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
        // Nothing is buffered outside `data`
        Ok(())
    }

    fn position(&self) -> u64 {
        self.cursor
    }

    fn len(&self) -> u64 {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn memory_write_then_read_back() {
        let mut stream = MemoryStream::zeroed(11);
        stream.write(b"hello").unwrap();
        stream.write(b" world").unwrap();
        assert!(stream.end_of_input());

        stream.rewind();
        let mut buf = [0u8; 11];
        stream.read(&mut buf).unwrap();
        assert_eq!(&buf, b"hello world");
    }

    #[test]
    fn memory_write_past_end_fails() {
        let mut stream = MemoryStream::zeroed(4);
        stream.write(b"abc").unwrap();

        let result = stream.write(b"de");
        assert!(matches!(result, Err(StorageError::WritePastEnd { .. })));
        assert_eq!(stream.position(), 3);
    }

    #[test]
    fn memory_read_past_end_fails() {
        let mut stream = MemoryStream::new(b"hello".to_vec());
        stream.skip(3).unwrap();

        let mut buf = [0u8; 4];
        let result = stream.read(&mut buf);
        assert!(matches!(result, Err(StorageError::ReadPastEnd { .. })));
    }

    #[test]
    fn memory_logical_length_bounds_writes() {
        let mut stream = MemoryStream::with_len(vec![0u8; 8], 4).unwrap();
        assert_eq!(stream.len(), 4);
        assert!(stream.write(b"12345").is_err());
        stream.write(b"1234").unwrap();
        assert!(stream.end_of_input());
    }

    #[test]
    fn memory_with_len_rejects_short_buffer() {
        let result = MemoryStream::with_len(vec![0u8; 2], 4);
        assert!(matches!(result, Err(StorageError::BufferTooSmall { .. })));
    }

    #[test]
    fn memory_skip_negative() {
        let mut stream = MemoryStream::new(b"abcdef".to_vec());
        stream.skip(4).unwrap();
        assert_eq!(stream.skip(-2).unwrap(), -2);

        let mut buf = [0u8; 2];
        stream.read(&mut buf).unwrap();
        assert_eq!(&buf, b"cd");
    }

    #[test]
    fn memory_skip_before_start_fails() {
        let mut stream = MemoryStream::zeroed(4);
        assert!(stream.skip(-1).is_err());
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn memory_empty_stream_is_at_end() {
        let stream = MemoryStream::zeroed(0);
        assert!(stream.end_of_input());
        assert!(stream.is_empty());
    }

    #[test]
    fn memory_trace_hook_sees_transfers() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut stream = MemoryStream::zeroed(6);
        stream.set_trace_hook(Box::new(move |t: &StreamTrace| {
            sink.lock().push(*t);
        }));
        stream.write(b"abc").unwrap();
        stream.write(b"def").unwrap();
        stream.rewind();
        let mut buf = [0u8; 2];
        stream.read(&mut buf).unwrap();

        let seen = seen.lock();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1].offset, 3);
        assert_eq!(seen[2].op, StreamOp::Read);
        assert_eq!(stream.as_bytes(), b"abcdef");
    }

    #[test]
    fn memory_flush_succeeds() {
        let mut stream = MemoryStream::zeroed(1);
        assert!(stream.flush().is_ok());
    }
}
