//! Monitor interconnect (the address region table).
//!
//! This module implements the bus that routes global addresses to regions. It provides:
//! 1. **Device registration:** Regions are added by address range; overlaps are rejected.
//! 2. **Access routing:** Read/write by address with a RAM fast path and last-device hint.
//! 3. **Flush:** Pushes buffered device output before the process exits.
//! 4. **Memory access:** Direct handle on the RAM region for program-image seeding.
//!
//! Decoding compares all 64 address bits, reserved byte included, so an address
//! carrying an unexpected selector byte is unmapped rather than silently aliased.

use std::fmt;

use super::devices::Device;
use super::memory::Memory;
use crate::common::{MonitorError, MonitorResult};

/// Region table connecting the dispatcher to RAM and the monitor devices.
pub struct Bus {
    devices: Vec<Box<dyn Device>>,
    last_device_idx: usize,
    ram_idx: Option<usize>,
}

impl Bus {
    /// Creates an empty bus; add regions with `add_device`.
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            last_device_idx: 0,
            ram_idx: None,
        }
    }

    /// Registers a region; regions are kept sorted by base address.
    ///
    /// Fails with [`MonitorError::Overlap`] if the new window intersects an existing one,
    /// and with [`MonitorError::Config`] if the window is empty or wraps the address space.
    pub fn add_device(&mut self, dev: Box<dyn Device>) -> MonitorResult<()> {
        let (base, size) = dev.address_range();
        let end = base
            .checked_add(size)
            .filter(|_| size > 0)
            .ok_or_else(|| {
                MonitorError::Config(format!(
                    "{} window {base:#018x}+{size:#x} is empty or wraps",
                    dev.name()
                ))
            })?;

        if let Some(existing) = self.devices.iter().find(|d| {
            let (start, len) = d.address_range();
            base < start + len && start < end
        }) {
            return Err(MonitorError::Overlap {
                name: dev.name(),
                base,
                existing: existing.name(),
            });
        }

        self.devices.push(dev);
        self.devices.sort_by_key(|d| d.address_range().0);
        self.ram_idx = self.devices.iter().position(|d| d.name() == Memory::NAME);
        self.last_device_idx = 0;
        Ok(())
    }

    /// Number of registered regions.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Returns the name of the region claiming `addr`, if any.
    pub fn region_name(&self, addr: u64) -> Option<&'static str> {
        self.devices
            .iter()
            .find(|d| Self::contains(d.as_ref(), addr))
            .map(|d| d.name())
    }

    /// Returns whether `addr` is claimed by any region.
    pub fn is_valid_address(&self, addr: u64) -> bool {
        self.region_name(addr).is_some()
    }

    /// Reads `len` bytes at global address `addr`.
    pub fn read(&mut self, addr: u64, len: usize) -> MonitorResult<Vec<u8>> {
        let (dev, offset) = self.find_device(addr)?;
        dev.read(offset, len)
    }

    /// Writes `data` at global address `addr`.
    pub fn write(&mut self, addr: u64, data: &[u8]) -> MonitorResult<()> {
        let (dev, offset) = self.find_device(addr)?;
        dev.write(offset, data)
    }

    /// Flushes every region, stopping at the first failure.
    pub fn flush(&mut self) -> MonitorResult<()> {
        self.devices.iter_mut().try_for_each(|d| d.flush())
    }

    /// Returns the RAM region, if one is registered.
    pub fn memory_mut(&mut self) -> Option<&mut Memory> {
        let idx = self.ram_idx?;
        self.devices[idx].as_memory_mut()
    }

    fn contains(dev: &dyn Device, addr: u64) -> bool {
        let (start, size) = dev.address_range();
        addr >= start && addr - start < size
    }

    fn find_device(&mut self, addr: u64) -> MonitorResult<(&mut Box<dyn Device>, u64)> {
        if self.last_device_idx < self.devices.len()
            && Self::contains(self.devices[self.last_device_idx].as_ref(), addr)
        {
            let idx = self.last_device_idx;
            let (start, _) = self.devices[idx].address_range();
            return Ok((&mut self.devices[idx], addr - start));
        }

        if let Some(idx) = self.ram_idx {
            if Self::contains(self.devices[idx].as_ref(), addr) {
                self.last_device_idx = idx;
                let (start, _) = self.devices[idx].address_range();
                return Ok((&mut self.devices[idx], addr - start));
            }
        }

        let idx = self
            .devices
            .iter()
            .position(|d| Self::contains(d.as_ref(), addr))
            .ok_or(MonitorError::UnsupportedAddress(addr))?;
        self.last_device_idx = idx;
        let (start, _) = self.devices[idx].address_range();
        Ok((&mut self.devices[idx], addr - start))
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for dev in &self.devices {
            let (base, size) = dev.address_range();
            let _ = list.entry(&format_args!("{} @ {base:#018x}+{size:#x}", dev.name()));
        }
        list.finish()
    }
}
