//! Character-output device.
//!
//! The simulated program prints by storing one character at a time to a single
//! fixed address. Each write emits the first payload byte as a character and
//! flushes the sink immediately, so output already printed is never lost when the
//! termination transaction ends the process.

use std::fmt;
use std::io::{self, Write};

use crate::common::{MonitorError, MonitorResult};
use crate::soc::devices::Device;
use crate::umi::Opcode;

/// Write-only console occupying a one-byte window.
pub struct Console {
    base_addr: u64,
    sink: Box<dyn Write + Send>,
    chars_written: u64,
}

impl Console {
    /// Device name reported on the bus.
    pub const NAME: &'static str = "UART";

    /// Creates a console at `base_addr` that prints to stdout, or stderr if `to_stderr`.
    pub fn new(base_addr: u64, to_stderr: bool) -> Self {
        let sink: Box<dyn Write + Send> = if to_stderr {
            Box::new(io::stderr())
        } else {
            Box::new(io::stdout())
        };
        Self::with_sink(base_addr, sink)
    }

    /// Creates a console at `base_addr` writing to an arbitrary sink.
    pub fn with_sink(base_addr: u64, sink: Box<dyn Write + Send>) -> Self {
        Self {
            base_addr,
            sink,
            chars_written: 0,
        }
    }

    /// Number of characters emitted so far.
    pub const fn chars_written(&self) -> u64 {
        self.chars_written
    }

    fn emit(&mut self, byte: u8) -> MonitorResult<()> {
        let mut buf = [0u8; 4];
        let encoded = char::from(byte).encode_utf8(&mut buf);
        self.sink.write_all(encoded.as_bytes())?;
        self.sink.flush()?;
        self.chars_written += 1;
        Ok(())
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("base_addr", &format_args!("{:#018x}", self.base_addr))
            .field("chars_written", &self.chars_written)
            .finish_non_exhaustive()
    }
}

impl Device for Console {
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
        let Some(&byte) = data.first() else {
            return Err(MonitorError::MalformedPayload {
                device: Self::NAME,
                expected: 1,
                actual: 0,
            });
        };
        self.emit(byte)
    }

    fn flush(&mut self) -> MonitorResult<()> {
        self.sink.flush()?;
        Ok(())
    }
}
