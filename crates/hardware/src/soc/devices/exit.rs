//! Simulation termination device.
//!
//! The simulated program ends the run by storing its exit code to a single fixed
//! address. The first four payload bytes are decoded as a little-endian `u32` and
//! published through the shared `exit_request`, which the dispatcher checks after
//! every transaction. `u64::MAX` in `exit_request` means no exit has been requested.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::common::{MonitorError, MonitorResult};
use crate::soc::devices::Device;
use crate::umi::Opcode;

/// Exit-code device occupying a one-byte window.
#[derive(Debug)]
pub struct ExitDevice {
    base_addr: u64,
    exit_signal: Arc<AtomicU64>,
}

impl ExitDevice {
    /// Device name reported on the bus.
    pub const NAME: &'static str = "EXIT";

    /// Creates the device at `base_addr` using the shared exit signal.
    pub const fn new(base_addr: u64, exit_signal: Arc<AtomicU64>) -> Self {
        Self {
            base_addr,
            exit_signal,
        }
    }
}

impl Device for ExitDevice {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn address_range(&self) -> (u64, u64) {
        (self.base_addr, 1)
    }

    fn read(&mut self, offset: u64, _len: usize) -> MonitorResult<Vec<u8>> {
        Err(MonitorError::UnsupportedAccess {
            device: Self::NAME,
            opcode: Opcode::ReqRead,
            address: self.base_addr + offset,
        })
    }

    fn write(&mut self, _offset: u64, data: &[u8]) -> MonitorResult<()> {
        let Some(code) = data.first_chunk::<4>().copied().map(u32::from_le_bytes) else {
            return Err(MonitorError::MalformedPayload {
                device: Self::NAME,
                expected: 4,
                actual: data.len(),
            });
        };
        self.exit_signal.store(u64::from(code), Ordering::Relaxed);
        Ok(())
    }
}
