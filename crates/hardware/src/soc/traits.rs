//! Device trait for memory-mapped regions.
//!
//! This module defines the `Device` trait implemented by every bus-attached region. It provides:
//! 1. **Identification:** `name` and `address_range` for bus routing.
//! 2. **Access:** Byte-sequence read/write at device-relative offsets, both fallible.
//! 3. **Lifecycle:** `flush` so buffered side effects land before the process exits.
//! 4. **Downcasting:** Optional cast to `Memory` for program-image seeding.
//!
//! All implementors must be `Send` so a `System` can be moved into a Python-owned monitor.

use crate::common::MonitorResult;
use crate::soc::memory::Memory;

/// Trait for memory-mapped regions attached to the monitor's bus.
pub trait Device: Send {
    /// Returns a short name for this device (e.g., `"RAM"`, `"UART"`).
    fn name(&self) -> &'static str;

    /// Returns `(base_address, size_in_bytes)` of the global address window this device claims.
    fn address_range(&self) -> (u64, u64);

    /// Reads `len` bytes starting at the given device-relative offset.
    fn read(&mut self, offset: u64, len: usize) -> MonitorResult<Vec<u8>>;

    /// Writes `data` starting at the given device-relative offset.
    fn write(&mut self, offset: u64, data: &[u8]) -> MonitorResult<()>;

    /// Pushes any buffered output to its destination.
    fn flush(&mut self) -> MonitorResult<()> {
        Ok(())
    }

    /// Returns a mutable reference as `Memory` if this device is RAM; otherwise `None`.
    fn as_memory_mut(&mut self) -> Option<&mut Memory> {
        None
    }
}
