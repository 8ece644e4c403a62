//! Device RAM (the Memory Model).
//!
//! This module implements the byte-addressable store that stands in for the
//! chiplet's main memory. It provides:
//! 1. **Buffer:** Bounds-checked backing storage (`RamBuffer`).
//! 2. **Memory:** The region device mapped at the RAM base of the global address map.
//!
//! Memory-model addresses start at 0; the bus translates global addresses into
//! these offsets before calling in. The dispatcher guarantees at most one access
//! in flight, so there is no internal locking.

/// Bounds-checked byte buffer.
pub mod buffer;

use self::buffer::RamBuffer;
use crate::common::{MonitorError, MonitorResult};
use crate::soc::devices::Device;

/// Main memory region.
#[derive(Debug)]
pub struct Memory {
    buffer: RamBuffer,
    base_addr: u64,
}

impl Memory {
    /// Device name reported on the bus.
    pub const NAME: &'static str = "RAM";

    /// Creates a zeroed memory of `size` bytes mapped at global address `base_addr`.
    pub fn new(size: usize, base_addr: u64) -> Self {
        Self {
            buffer: RamBuffer::new(size),
            base_addr,
        }
    }

    /// Capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Seeds `data` at `offset`, typically with a program image before the run starts.
    ///
    /// Fails with [`MonitorError::ImageOutOfBounds`] if the image does not fit.
    pub fn initialize(&mut self, offset: u64, data: &[u8]) -> MonitorResult<()> {
        self.buffer
            .write_slice(offset, data)
            .map_err(|_| MonitorError::ImageOutOfBounds {
                offset,
                len: data.len(),
                capacity: self.buffer.len(),
            })
    }

    /// Copies `data` into the store at `address`.
    pub fn write(&mut self, address: u64, data: &[u8]) -> MonitorResult<()> {
        self.buffer.write_slice(address, data)
    }

    /// Returns a copy of `length` bytes starting at `address`.
    pub fn read(&self, address: u64, length: usize) -> MonitorResult<Vec<u8>> {
        self.buffer.read_slice(address, length).map(<[u8]>::to_vec)
    }
}

impl Device for Memory {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn address_range(&self) -> (u64, u64) {
        (self.base_addr, self.buffer.len() as u64)
    }

    fn read(&mut self, offset: u64, len: usize) -> MonitorResult<Vec<u8>> {
        Self::read(self, offset, len)
    }

    fn write(&mut self, offset: u64, data: &[u8]) -> MonitorResult<()> {
        Self::write(self, offset, data)
    }

    fn as_memory_mut(&mut self) -> Option<&mut Memory> {
        Some(self)
    }
}
