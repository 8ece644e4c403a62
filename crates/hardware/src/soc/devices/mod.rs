//! Memory-Mapped Monitor Devices.
//!
//! This module contains the side-effecting regions the monitor serves next to RAM:
//! the character-output console and the simulation termination device.

/// Character-output device.
pub mod console;

/// Simulation termination device.
pub mod exit;

pub use console::Console;
pub use exit::ExitDevice;

pub use crate::soc::traits::Device;
