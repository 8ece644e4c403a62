//! Common types shared by the bus, devices, and dispatcher.
//!
//! This module provides the fundamental building blocks used across the crate:
//! 1. **Address Types:** A strong type for UMI global addresses.
//! 2. **Constants:** Bit-field positions for addresses and command words.
//! 3. **Error Handling:** The crate-wide `MonitorError` type.

/// Global address type definitions.
pub mod addr;

/// Bit-field constants for addresses and command words.
pub mod constants;

/// Error types.
pub mod error;

pub use addr::GlobalAddr;
pub use error::{MonitorError, MonitorResult};
