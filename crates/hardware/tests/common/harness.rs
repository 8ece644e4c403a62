use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::EnvFilter;
use umi_monitor_core::config::{AddressMapConfig, Config};
use umi_monitor_core::umi::{Opcode, QueueTransport, UmiPacket};
use umi_monitor_core::Monitor;

/// Source address the simulated host uses for every request.
pub const HOST: u64 = 0x0000_0001_0000_0000;

/// Monitor under test, fed by an in-memory queue.
pub type TestMonitor = Monitor<QueueTransport>;

/// Console sink shared between a monitor and the test inspecting it.
#[derive(Clone, Debug, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn bytes(&self) -> Vec<u8> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Everything written so far, as text.
    pub fn text(&self) -> String {
        String::from_utf8(self.bytes()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Installs a test-writer `tracing` subscriber once per process.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("umi_monitor_core=debug"))
        .with_test_writer()
        .try_init();
}

/// Builds a configuration using `map` and default polling.
pub fn config_for(map: AddressMapConfig) -> Config {
    Config {
        address_map: map,
        ..Config::default()
    }
}

/// Builds a monitor with an open, empty transport and a captured console.
pub fn monitor(config: &Config) -> (TestMonitor, SharedBuffer) {
    init_tracing();
    let console = SharedBuffer::new();
    let monitor =
        Monitor::with_console(config, QueueTransport::new(), Box::new(console.clone())).unwrap();
    (monitor, console)
}

/// Builds a monitor that will receive exactly `packets`, then report the transport closed.
pub fn replay(config: &Config, packets: Vec<UmiPacket>) -> (TestMonitor, SharedBuffer) {
    init_tracing();
    let console = SharedBuffer::new();
    let monitor = Monitor::with_console(
        config,
        QueueTransport::replay(packets),
        Box::new(console.clone()),
    )
    .unwrap();
    (monitor, console)
}

/// Byte-granular read request from the host.
pub fn read(addr: u64, nbytes: usize) -> UmiPacket {
    UmiPacket::read_request(addr, HOST, nbytes).unwrap()
}

/// Acknowledged write request from the host.
pub fn write(addr: u64, data: &[u8]) -> UmiPacket {
    UmiPacket::write_request(Opcode::ReqWrite, addr, HOST, data.to_vec()).unwrap()
}

/// Posted write request from the host.
pub fn posted(addr: u64, data: &[u8]) -> UmiPacket {
    UmiPacket::write_request(Opcode::ReqPosted, addr, HOST, data.to_vec()).unwrap()
}

/// Posted writes of each character of `text` to the console address of `map`.
pub fn print(map: &AddressMapConfig, text: &str) -> Vec<UmiPacket> {
    text.bytes().map(|b| posted(map.uart_addr(), &[b])).collect()
}

/// Posted write of `code` to the exit address of `map`.
pub fn exit(map: &AddressMapConfig, code: u32) -> UmiPacket {
    posted(map.exit_addr(), &code.to_le_bytes())
}
