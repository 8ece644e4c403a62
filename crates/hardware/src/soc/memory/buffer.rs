//! RAM Buffer Implementation.
//!
//! Fixed-capacity byte store backing the Memory Model. Every access is checked
//! against the capacity and reported as [`MonitorError::OutOfBounds`]; nothing wraps
//! and nothing is partially written.

use std::ops::Range;

use crate::common::{MonitorError, MonitorResult};

/// A zero-initialized, fixed-capacity byte buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RamBuffer {
    bytes: Vec<u8>,
}

impl RamBuffer {
    /// Creates a zeroed buffer of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![0; size],
        }
    }

    /// Returns the capacity of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the buffer has zero capacity.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Reads a single byte.
    pub fn read_u8(&self, offset: u64) -> MonitorResult<u8> {
        let range = self.checked_range(offset, 1)?;
        Ok(self.bytes[range.start])
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, offset: u64, val: u8) -> MonitorResult<()> {
        let range = self.checked_range(offset, 1)?;
        self.bytes[range.start] = val;
        Ok(())
    }

    /// Borrows `len` bytes starting at `offset`.
    pub fn read_slice(&self, offset: u64, len: usize) -> MonitorResult<&[u8]> {
        let range = self.checked_range(offset, len)?;
        Ok(&self.bytes[range])
    }

    /// Copies `data` into the buffer starting at `offset`.
    pub fn write_slice(&mut self, offset: u64, data: &[u8]) -> MonitorResult<()> {
        let range = self.checked_range(offset, data.len())?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    /// Validates `[offset, offset + len)` against the capacity.
    fn checked_range(&self, offset: u64, len: usize) -> MonitorResult<Range<usize>> {
        let out_of_bounds = || MonitorError::OutOfBounds {
            offset,
            len,
            capacity: self.bytes.len(),
        };
        let start = usize::try_from(offset).map_err(|_| out_of_bounds())?;
        let end = start.checked_add(len).ok_or_else(out_of_bounds)?;
        if end > self.bytes.len() {
            return Err(out_of_bounds());
        }
        Ok(start..end)
    }
}
