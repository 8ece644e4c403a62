//! Software UMI bus participant for chiplet RTL simulations.
//!
//! This crate implements the host-side monitor that a simulated chiplet talks to over UMI:
//! 1. **UMI:** Command words, opcodes, packets, and the transport seam.
//! 2. **Memory:** A byte-addressable RAM model seeded with the program image.
//! 3. **SoC:** The region table routing global addresses to RAM, console, and exit devices.
//! 4. **Simulation:** The transaction dispatcher, poll strategies, and program loading.
//! 5. **Configuration and statistics:** Address map selection and per-run counters.

/// Common types and constants (global addresses, field layouts, errors).
pub mod common;
/// Monitor configuration (address map, polling, console).
pub mod config;
/// Dispatch loop, poll strategies, and program loader.
pub mod sim;
/// Region table (builder, bus, devices, memory, traits).
pub mod soc;
/// Per-run transaction statistics.
pub mod stats;
/// UMI command words, opcodes, packets, and transports.
pub mod umi;

/// Error type returned by every fallible operation in the crate.
pub use crate::common::{GlobalAddr, MonitorError, MonitorResult};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Transaction dispatcher; construct with `Monitor::new`.
pub use crate::sim::{Monitor, MonitorState, Step};
/// Region table and exit flag; construct with `System::new`.
pub use crate::soc::System;
/// Per-run counters.
pub use crate::stats::MonitorStats;
/// UMI protocol types.
pub use crate::umi::{Opcode, QueueTransport, Transport, UmiCmd, UmiPacket};
