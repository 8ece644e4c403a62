//! Monitor system construction and top-level `System` type.
//!
//! This module builds the region table from configuration. It performs:
//! 1. **Validation:** Rejects address maps that cannot be decoded unambiguously.
//! 2. **Device registration:** RAM (when served), the console, and the exit device.
//! 3. **Program loading:** Seeds RAM with a program image before the run starts.

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::common::constants::NO_EXIT;
use crate::common::{MonitorError, MonitorResult};
use crate::config::Config;
use crate::soc::devices::{Console, ExitDevice};
use crate::soc::interconnect::Bus;
use crate::soc::memory::Memory;

/// Region table plus the shared exit flag.
#[derive(Debug)]
pub struct System {
    /// Address region table.
    pub bus: Bus,
    /// Exit code requested by the program; `u64::MAX` while the run continues.
    pub exit_request: Arc<AtomicU64>,
}

impl System {
    /// Builds the region table, sending console output where `config.console` says.
    pub fn new(config: &Config) -> MonitorResult<Self> {
        let console = Console::new(
            config.address_map.uart_addr(),
            config.console.to_stderr,
        );
        Self::assemble(config, console)
    }

    /// Builds the region table with console output going to `sink`.
    pub fn with_console(config: &Config, sink: Box<dyn Write + Send>) -> MonitorResult<Self> {
        let console = Console::with_sink(config.address_map.uart_addr(), sink);
        Self::assemble(config, console)
    }

    fn assemble(config: &Config, console: Console) -> MonitorResult<Self> {
        config.validate()?;
        let map = &config.address_map;
        let mut bus = Bus::new();
        let exit_request = Arc::new(AtomicU64::new(NO_EXIT));

        if map.serve_ram {
            let size = usize::try_from(map.ram_size)
                .map_err(|_| MonitorError::Config("ram_size exceeds host memory".into()))?;
            bus.add_device(Box::new(Memory::new(size, map.ram_base())))?;
        }
        bus.add_device(Box::new(console))?;
        bus.add_device(Box::new(ExitDevice::new(
            map.exit_addr(),
            Arc::clone(&exit_request),
        )))?;

        Ok(Self { bus, exit_request })
    }

    /// Seeds RAM with `data` at memory offset `offset`.
    pub fn load_binary_at(&mut self, data: &[u8], offset: u64) -> MonitorResult<()> {
        self.bus
            .memory_mut()
            .ok_or(MonitorError::NoMemory)?
            .initialize(offset, data)
    }

    /// Takes the pending exit code, if the program has requested termination.
    pub fn take_exit(&self) -> Option<u32> {
        match self.exit_request.swap(NO_EXIT, Ordering::Relaxed) {
            NO_EXIT => None,
            code => u32::try_from(code).ok(),
        }
    }
}
