//! Transaction dispatcher.
//!
//! The `Monitor` owns the region table and a transport, and services one inbound
//! packet per poll:
//! 1. **Decode:** Only `REQ_READ`, `REQ_WRITE`, and `REQ_POSTED` are accepted.
//! 2. **Route:** The bus resolves the destination to RAM, the console, or the exit device.
//! 3. **Respond:** Reads answer with `RESP_READ`; non-posted writes are acknowledged
//!    with `RESP_WRITE`; posted writes and the termination write get no response.
//! 4. **Terminate:** A write to the exit device flushes output and stops the loop with
//!    the carried exit code.
//!
//! Each packet is fully handled, response included, before the next poll, so there is
//! never more than one transaction in flight.

use std::io::Write;

use tracing::{debug, error, info, trace};

use crate::common::{MonitorError, MonitorResult};
use crate::config::{AddressMapConfig, Config};
use crate::sim::poll::Poller;
use crate::soc::System;
use crate::stats::MonitorStats;
use crate::umi::{Opcode, Transport, UmiPacket};

/// Dispatcher state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MonitorState {
    /// Servicing packets.
    Running,
    /// The program wrote its exit code; terminal.
    Terminated(u32),
}

/// Outcome of one poll iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The transport had no packet.
    Idle,
    /// One packet was serviced and the monitor is still running.
    Serviced,
    /// The monitor has terminated with this exit code.
    Terminated(u32),
}

/// Software bus participant serving RAM, console output, and termination.
#[derive(Debug)]
pub struct Monitor<T: Transport> {
    system: System,
    map: AddressMapConfig,
    transport: T,
    poller: Poller,
    state: MonitorState,
    stats: MonitorStats,
}

impl<T: Transport> Monitor<T> {
    /// Creates a monitor whose console prints to stdout (or stderr, per `config.console`).
    pub fn new(config: &Config, transport: T) -> MonitorResult<Self> {
        let system = System::new(config)?;
        Ok(Self::from_system(config, system, transport))
    }

    /// Creates a monitor whose console writes to `sink`.
    pub fn with_console(
        config: &Config,
        transport: T,
        sink: Box<dyn Write + Send>,
    ) -> MonitorResult<Self> {
        let system = System::with_console(config, sink)?;
        Ok(Self::from_system(config, system, transport))
    }

    fn from_system(config: &Config, system: System, transport: T) -> Self {
        Self {
            system,
            map: config.address_map.clone(),
            transport,
            poller: Poller::new(&config.poll),
            state: MonitorState::Running,
            stats: MonitorStats::new(),
        }
    }

    /// Seeds RAM with `data` at memory offset `offset`.
    pub fn initialize_memory(&mut self, offset: u64, data: &[u8]) -> MonitorResult<()> {
        self.system.load_binary_at(data, offset)
    }

    /// Returns a copy of `len` bytes of RAM starting at memory offset `offset`.
    pub fn read_memory(&mut self, offset: u64, len: usize) -> MonitorResult<Vec<u8>> {
        self.system
            .bus
            .memory_mut()
            .ok_or(MonitorError::NoMemory)?
            .read(offset, len)
    }

    /// Current dispatcher state.
    pub const fn state(&self) -> MonitorState {
        self.state
    }

    /// Counters for this run.
    pub const fn stats(&self) -> &MonitorStats {
        &self.stats
    }

    /// Address map this monitor decodes against.
    pub const fn address_map(&self) -> &AddressMapConfig {
        &self.map
    }

    /// Borrows the transport.
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrows the transport.
    pub const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consumes the monitor, returning its transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Dispatches one packet and returns the response it requires, if any.
    ///
    /// Does not touch the transport. Any request carrying an exit code to the exit
    /// address, `REQ_READ` included, moves the monitor to [`MonitorState::Terminated`]
    /// and never produces a response.
    pub fn service(&mut self, packet: &UmiPacket) -> MonitorResult<Option<UmiPacket>> {
        self.stats.packets += 1;
        let opcode = packet.opcode();
        let addr = packet.dstaddr;

        match opcode {
            Opcode::ReqRead if addr == self.map.exit_addr() => {
                // The exit address terminates on any request carrying a code.
                self.system
                    .bus
                    .write(addr, &packet.data)
                    .map_err(|e| Self::fatal(packet, e))?;
                let _ = self.check_exit()?;
                Ok(None)
            }
            Opcode::ReqRead => {
                let nbytes = packet.cmd.num_bytes();
                let data = self
                    .system
                    .bus
                    .read(addr, nbytes)
                    .map_err(|e| Self::fatal(packet, e))?;
                self.stats.reads += 1;
                self.stats.bytes_read += data.len() as u64;
                Ok(Some(packet.respond(Opcode::RespRead, data)))
            }
            op if op.is_write() => {
                self.system
                    .bus
                    .write(addr, &packet.data)
                    .map_err(|e| Self::fatal(packet, e))?;
                self.record_write(op, addr, packet.data.len());

                if self.check_exit()? {
                    return Ok(None);
                }

                Ok((op == Opcode::ReqWrite).then(|| packet.respond(Opcode::RespWrite, Vec::new())))
            }
            other => Err(Self::fatal(packet, MonitorError::UnsupportedOpcode(other))),
        }
    }

    /// Runs one iteration of the dispatch loop: poll, service, respond.
    ///
    /// A terminated monitor returns [`Step::Terminated`] again without polling.
    pub fn step(&mut self) -> MonitorResult<Step> {
        if let MonitorState::Terminated(code) = self.state {
            return Ok(Step::Terminated(code));
        }

        let Some(packet) = self.transport.try_recv()? else {
            self.stats.idle_polls += 1;
            trace!("empty poll");
            return Ok(Step::Idle);
        };

        debug!(
            cmd = %packet.cmd,
            dstaddr = format_args!("{:#018x}", packet.dstaddr),
            srcaddr = format_args!("{:#018x}", packet.srcaddr),
            len = packet.data.len(),
            "servicing packet"
        );

        if let Some(response) = self.service(&packet)? {
            self.transport.send(response)?;
            self.stats.responses += 1;
        }

        Ok(match self.state {
            MonitorState::Running => Step::Serviced,
            MonitorState::Terminated(code) => Step::Terminated(code),
        })
    }

    /// Services packets until the program terminates, returning its exit code.
    pub fn run(&mut self) -> MonitorResult<u32> {
        self.run_with_hook(|| Ok(()))
    }

    /// Like [`Monitor::run`], calling `on_idle` after every empty poll.
    ///
    /// An error from the hook stops the loop and is returned unchanged.
    pub fn run_with_hook<F>(&mut self, mut on_idle: F) -> MonitorResult<u32>
    where
        F: FnMut() -> MonitorResult<()>,
    {
        loop {
            match self.step()? {
                Step::Idle => {
                    self.poller.idle();
                    on_idle()?;
                }
                Step::Serviced => self.poller.reset(),
                Step::Terminated(code) => return Ok(code),
            }
        }
    }

    /// Moves to `Terminated` if the last write reached the exit device, then flushes output.
    fn check_exit(&mut self) -> MonitorResult<bool> {
        let Some(code) = self.system.take_exit() else {
            return Ok(false);
        };
        self.state = MonitorState::Terminated(code);
        info!(code, "program requested termination");
        self.system.bus.flush()?;
        Ok(true)
    }

    fn record_write(&mut self, opcode: Opcode, addr: u64, len: usize) {
        if opcode == Opcode::ReqPosted {
            self.stats.posted_writes += 1;
        } else {
            self.stats.writes += 1;
        }
        self.stats.bytes_written += len as u64;
        if addr == self.map.uart_addr() {
            self.stats.console_bytes += 1;
        }
    }

    fn fatal(packet: &UmiPacket, err: MonitorError) -> MonitorError {
        error!(
            cmd = %packet.cmd,
            dstaddr = format_args!("{:#018x}", packet.dstaddr),
            srcaddr = format_args!("{:#018x}", packet.srcaddr),
            "{err}"
        );
        err
    }
}
