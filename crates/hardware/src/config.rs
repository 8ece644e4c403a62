//! Configuration system for the UMI monitor.
//!
//! This module defines all configuration structures used to parameterize the monitor.
//! It provides:
//! 1. **Defaults:** The reference address map (RAM at chip `0x0000`, monitor at `0xCCCC`).
//! 2. **Structures:** Address map, polling strategy, and console settings.
//! 3. **Validation:** Rejection of address maps that cannot be decoded unambiguously.
//!
//! Configuration is supplied as JSON (from the Python bindings or `--config` on the CLI),
//! or built with `Config::default()`. Nothing here is process-wide state: two monitors
//! with different address-map variants can coexist in one process.

use serde::Deserialize;

use crate::common::constants::OFFSET_MASK;
use crate::common::{GlobalAddr, MonitorError, MonitorResult};
use crate::sim::poll::PollStrategy;

/// Default configuration constants for the monitor.
///
/// These values must match the hardware address map bit-for-bit.
mod defaults {
    /// Chip ID of the main memory region.
    pub const RAM_CHIPID: u16 = 0x0000;

    /// Capacity of the main memory region (32 KiB).
    pub const RAM_SIZE: u64 = 32 * 1024;

    /// Chip ID owning the console and exit addresses.
    pub const MONITOR_CHIPID: u16 = 0xCCCC;

    /// Chiplet offset of the character-output address.
    pub const UART_OFFSET: u64 = 0x00_C000_0000;

    /// Chiplet offset of the termination address.
    pub const EXIT_OFFSET: u64 = 0x00_D000_0000;

    /// Consecutive empty polls spent spinning before the backoff strategy sleeps.
    pub const SPIN_LIMIT: u32 = 64;

    /// Upper bound on a single backoff sleep, in microseconds.
    pub const MAX_SLEEP_US: u64 = 1000;
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use umi_monitor_core::config::Config;
///
/// let json = r#"{
///     "address_map": { "selector": 1, "ram_size": 65536 },
///     "poll": { "strategy": "Backoff", "max_sleep_us": 250 },
///     "console": { "to_stderr": true }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.address_map.selector, 1);
/// assert_eq!(config.address_map.uart_addr(), 0x01CC_CC00_C000_0000);
/// assert_eq!(config.poll.max_sleep_us, 250);
/// assert!(config.console.to_stderr);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Region table layout
    #[serde(default)]
    pub address_map: AddressMapConfig,
    /// Empty-poll handling
    #[serde(default)]
    pub poll: PollConfig,
    /// Program output destination
    #[serde(default)]
    pub console: ConsoleConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> MonitorResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| MonitorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a decodable address map.
    pub fn validate(&self) -> MonitorResult<()> {
        self.address_map.validate()
    }
}

/// Address map shared with the hardware.
///
/// The monitor addresses are `(selector << 56) | (chip_id << 40) | offset`. The direct-attached
/// topology uses selector 0; the crossbar-routed topology prefixes a non-zero selector byte.
/// RAM always sits in region 0 with a zero top byte, whatever the topology.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressMapConfig {
    /// Reserved top byte (bits 63:56) expected on the console and exit addresses
    #[serde(default)]
    pub selector: u8,

    /// Chip ID of the RAM region
    #[serde(default = "AddressMapConfig::default_ram_chip_id")]
    pub ram_chip_id: u16,

    /// RAM capacity in bytes
    #[serde(default = "AddressMapConfig::default_ram_size")]
    pub ram_size: u64,

    /// Whether this monitor serves RAM (false when a hardware memory agent does)
    #[serde(default = "AddressMapConfig::default_serve_ram")]
    pub serve_ram: bool,

    /// Chip ID owning the console and exit addresses
    #[serde(default = "AddressMapConfig::default_monitor_chip_id")]
    pub monitor_chip_id: u16,

    /// Chiplet offset of the character-output address
    #[serde(default = "AddressMapConfig::default_uart_offset")]
    pub uart_offset: u64,

    /// Chiplet offset of the termination address
    #[serde(default = "AddressMapConfig::default_exit_offset")]
    pub exit_offset: u64,
}

impl AddressMapConfig {
    /// The direct-attached variant (selector byte 0).
    pub fn direct() -> Self {
        Self::default()
    }

    /// The crossbar-routed variant, whose console and exit addresses carry `selector`
    /// in bits 63:56.
    pub fn crossbar(selector: u8) -> Self {
        Self {
            selector,
            ..Self::default()
        }
    }

    /// Global address of the first RAM byte; the selector byte never applies to RAM.
    pub const fn ram_base(&self) -> u64 {
        GlobalAddr::compose(0, self.ram_chip_id, 0).val()
    }

    /// Global address of the character-output register.
    pub const fn uart_addr(&self) -> u64 {
        GlobalAddr::compose(self.selector, self.monitor_chip_id, self.uart_offset).val()
    }

    /// Global address of the termination register.
    pub const fn exit_addr(&self) -> u64 {
        GlobalAddr::compose(self.selector, self.monitor_chip_id, self.exit_offset).val()
    }

    /// Rejects maps whose regions would be truncated, aliased, or empty.
    pub fn validate(&self) -> MonitorResult<()> {
        if self.serve_ram {
            if self.ram_size == 0 {
                return Err(MonitorError::Config("ram_size must be non-zero".into()));
            }
            if self.ram_size > OFFSET_MASK + 1 {
                return Err(MonitorError::Config(format!(
                    "ram_size {:#x} crosses the chip ID boundary",
                    self.ram_size
                )));
            }
            if usize::try_from(self.ram_size).is_err() {
                return Err(MonitorError::Config(format!(
                    "ram_size {:#x} exceeds the host address space",
                    self.ram_size
                )));
            }
        }
        for (name, offset) in [("uart", self.uart_offset), ("exit", self.exit_offset)] {
            if offset & !OFFSET_MASK != 0 {
                return Err(MonitorError::Config(format!(
                    "{name}_offset {offset:#x} is wider than 40 bits"
                )));
            }
        }
        if self.uart_addr() == self.exit_addr() {
            return Err(MonitorError::Config(
                "uart and exit addresses must differ".into(),
            ));
        }
        Ok(())
    }

    /// Returns the default RAM chip ID.
    const fn default_ram_chip_id() -> u16 {
        defaults::RAM_CHIPID
    }

    /// Returns the default RAM size.
    const fn default_ram_size() -> u64 {
        defaults::RAM_SIZE
    }

    /// RAM is served unless disabled.
    const fn default_serve_ram() -> bool {
        true
    }

    /// Returns the default monitor chip ID.
    const fn default_monitor_chip_id() -> u16 {
        defaults::MONITOR_CHIPID
    }

    /// Returns the default console offset.
    const fn default_uart_offset() -> u64 {
        defaults::UART_OFFSET
    }

    /// Returns the default termination offset.
    const fn default_exit_offset() -> u64 {
        defaults::EXIT_OFFSET
    }
}

impl Default for AddressMapConfig {
    fn default() -> Self {
        Self {
            selector: 0,
            ram_chip_id: defaults::RAM_CHIPID,
            ram_size: defaults::RAM_SIZE,
            serve_ram: true,
            monitor_chip_id: defaults::MONITOR_CHIPID,
            uart_offset: defaults::UART_OFFSET,
            exit_offset: defaults::EXIT_OFFSET,
        }
    }
}

/// Empty-poll handling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PollConfig {
    /// What to do when a poll finds no packet
    #[serde(default)]
    pub strategy: PollStrategy,

    /// Empty polls spent spinning before `Backoff` starts sleeping
    #[serde(default = "PollConfig::default_spin_limit")]
    pub spin_limit: u32,

    /// Cap on a single `Backoff` sleep, in microseconds
    #[serde(default = "PollConfig::default_max_sleep_us")]
    pub max_sleep_us: u64,
}

impl PollConfig {
    /// Returns the default spin limit.
    const fn default_spin_limit() -> u32 {
        defaults::SPIN_LIMIT
    }

    /// Returns the default sleep cap.
    const fn default_max_sleep_us() -> u64 {
        defaults::MAX_SLEEP_US
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            strategy: PollStrategy::default(),
            spin_limit: defaults::SPIN_LIMIT,
            max_sleep_us: defaults::MAX_SLEEP_US,
        }
    }
}

/// Program output destination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConsoleConfig {
    /// When true, console output goes to stderr instead of stdout.
    #[serde(default)]
    pub to_stderr: bool,
}
