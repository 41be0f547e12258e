//! Stream trait definition.

use crate::error::StorageResult;

/// Kind of data transfer reported to a trace hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOp {
    /// Bytes were read from the stream.
    Read,
    /// Bytes were written to the stream.
    Write,
}

/// A single transfer observed by a trace hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamTrace {
    /// Direction of the transfer.
    pub op: StreamOp,
    /// Cursor position before the transfer.
    pub offset: u64,
    /// Number of bytes transferred.
    pub len: usize,
}

/// Callback invoked once per read or write.
///
/// Hooks observe transfers only; they cannot alter the bytes moved.
pub type TraceHook = Box<dyn FnMut(&StreamTrace) + Send>;

/// A cursor-based byte stream over a bounded region.
///
/// Every stream has a fixed **logical length** chosen at construction.
/// Streams never grow their backing storage: sizing is the caller's job
/// (pre-allocating a buffer, or letting [`super::GrowableFileStore`] extend
/// the file before each write).
///
/// # Invariants
///
/// - `read` and `write` transfer exactly `buf.len()` bytes or fail without
///   moving the cursor
/// - the cursor never goes below zero
/// - `end_of_input` is true once the cursor reaches the logical length
///
/// # Implementors
///
/// - [`super::MemoryStream`] - Owned, fixed-size buffer
/// - [`super::FileStream`] - Offset writes through a growable file
pub trait Stream {
    /// Reads `buf.len()` bytes at the cursor and advances it.
    ///
    /// # Errors
    ///
    /// Returns an error if the read would extend beyond the logical length
    /// or an I/O error occurs.
    fn read(&mut self, buf: &mut [u8]) -> StorageResult<usize>;

    /// Writes `data` at the cursor and advances it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write would extend beyond the logical length
    /// or an I/O error occurs.
    fn write(&mut self, data: &[u8]) -> StorageResult<usize>;

    /// Moves the cursor by `delta` bytes and returns `delta`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cursor would become negative.
    fn skip(&mut self, delta: i64) -> StorageResult<i64>;

    /// Resets the cursor to the start of the stream.
    fn rewind(&mut self);

    /// Returns true once the cursor has reached the logical length.
    fn end_of_input(&self) -> bool;

    /// Flushes pending writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    fn flush(&mut self) -> StorageResult<()>;

    /// Returns the current cursor position.
    fn position(&self) -> u64;

    /// Returns the logical length of the stream.
    fn len(&self) -> u64;

    /// Returns true if the logical length is zero.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Applies a signed displacement to a cursor.
pub(crate) fn displace(cursor: u64, delta: i64) -> StorageResult<u64> {
    cursor
        .checked_add_signed(delta)
        .ok_or(crate::StorageError::SeekOutOfRange { cursor, delta })
}

/// Checks that `len` bytes at `cursor` fit inside `limit`.
pub(crate) fn fits(cursor: u64, len: usize, limit: u64) -> bool {
    cursor
        .checked_add(len as u64)
        .is_some_and(|end| end <= limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displace_forward_and_back() {
        assert_eq!(displace(10, 5).unwrap(), 15);
        assert_eq!(displace(10, -10).unwrap(), 0);
    }

    #[test]
    fn displace_before_start_fails() {
        assert!(displace(3, -4).is_err());
    }

    #[test]
    fn fits_respects_limit() {
        assert!(fits(0, 8, 8));
        assert!(!fits(1, 8, 8));
        assert!(!fits(u64::MAX, 1, u64::MAX));
    }
}
