//! Monitor error definitions.
//!
//! This module defines the single error type returned by every fallible operation in
//! the crate. It groups failures into:
//! 1. **Protocol violations:** Unsupported opcodes, unmapped addresses, and accesses a
//!    device cannot perform. These mean the hardware address map and the monitor's
//!    region table disagree and are never retried.
//! 2. **Bounds violations:** Memory Model accesses outside `[0, capacity)`.
//! 3. **Environment failures:** Transport, console output, image loading, and configuration.

use thiserror::Error;

use crate::umi::Opcode;

/// Errors raised by the memory model, the bus, and the transaction dispatcher.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// A request carried an opcode the dispatcher does not service.
    #[error("unsupported opcode: {0}")]
    UnsupportedOpcode(Opcode),

    /// A request targeted an address no region claims. Carries the raw address.
    #[error("unsupported address: {0:#018x}")]
    UnsupportedAddress(u64),

    /// A device claimed the address but cannot perform the requested operation.
    #[error("{device} does not support {opcode} at {address:#018x}")]
    UnsupportedAccess {
        /// Name of the device that rejected the access.
        device: &'static str,
        /// Opcode of the rejected request.
        opcode: Opcode,
        /// Global address of the rejected request.
        address: u64,
    },

    /// A Memory Model access fell outside the store.
    #[error("access of {len} bytes at offset {offset:#x} exceeds memory capacity {capacity:#x}")]
    OutOfBounds {
        /// Starting offset of the access.
        offset: u64,
        /// Length of the access in bytes.
        len: usize,
        /// Capacity of the store in bytes.
        capacity: usize,
    },

    /// A program image does not fit at the requested offset.
    #[error(
        "program image of {len} bytes at offset {offset:#x} does not fit in {capacity:#x} bytes of memory"
    )]
    ImageOutOfBounds {
        /// Offset at which the image was to be placed.
        offset: u64,
        /// Image length in bytes.
        len: usize,
        /// Capacity of the store in bytes.
        capacity: usize,
    },

    /// A write carried fewer payload bytes than the device needs.
    #[error("malformed payload for {device}: expected at least {expected} bytes, got {actual}")]
    MalformedPayload {
        /// Name of the device that received the payload.
        device: &'static str,
        /// Minimum payload length the device needs.
        expected: usize,
        /// Payload length actually received.
        actual: usize,
    },

    /// Memory access was requested but this monitor does not serve RAM.
    #[error("no memory region is served by this monitor")]
    NoMemory,

    /// Two devices were registered over overlapping address ranges.
    #[error("{name} at {base:#018x} overlaps {existing}")]
    Overlap {
        /// Name of the device being registered.
        name: &'static str,
        /// Base address of the device being registered.
        base: u64,
        /// Name of the already registered device.
        existing: &'static str,
    },

    /// The transport was closed and has no further packets.
    #[error("transport closed before the simulation terminated")]
    TransportClosed,

    /// The transport failed to deliver or accept a packet.
    #[error("transport error: {0}")]
    Transport(String),

    /// Writing program output failed.
    #[error("console output failed: {0}")]
    Output(String),

    /// A program image could not be read or flattened.
    #[error("failed to load program image '{path}': {reason}")]
    Image {
        /// Path of the image file.
        path: String,
        /// Underlying failure.
        reason: String,
    },

    /// The configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The run loop was interrupted by its host (e.g. a Python signal).
    #[error("interrupted: {0}")]
    Interrupted(String),
}

impl MonitorError {
    /// Returns `true` for errors that indicate a mismatch between the hardware address
    /// map and this monitor's region table.
    pub const fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedOpcode(_)
                | Self::UnsupportedAddress(_)
                | Self::UnsupportedAccess { .. }
                | Self::MalformedPayload { .. }
        )
    }
}

impl From<std::io::Error> for MonitorError {
    fn from(err: std::io::Error) -> Self {
        Self::Output(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type MonitorResult<T> = Result<T, MonitorError>;
