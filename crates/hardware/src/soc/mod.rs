//! Monitor-side System-on-Chip components.
//!
//! This module organizes the regions the monitor serves on behalf of the simulated
//! chiplet: the RAM model, the console and exit devices, the interconnect that
//! routes addresses to them, and the builder that assembles them from configuration.

/// System builder for assembling the region table.
pub mod builder;

/// Memory-mapped monitor devices.
pub mod devices;

/// Address region table and routing.
pub mod interconnect;

/// Device RAM (the Memory Model).
pub mod memory;

/// Device trait definitions.
pub mod traits;

pub use builder::System;
