//! UMI global address type.
//!
//! This module defines a strong type for the 64-bit UMI global address so that
//! region decoding never happens through ad-hoc shifts at call sites. It provides:
//! 1. **Field access:** Reserved selector byte, 16-bit chip ID, and 40-bit offset.
//! 2. **Composition:** Building an address from its three fields.
//! 3. **Formatting:** Hex display matching the diagnostics printed by the bus.
//!
//! Layout:
//!
//! ```text
//!  63      56 55            40 39                                 0
//! +----------+----------------+------------------------------------+
//! | reserved |    chip ID     |     offset within the chiplet      |
//! +----------+----------------+------------------------------------+
//! ```

use std::fmt;

use super::constants::{CHIPID_MASK, CHIPID_SHIFT, OFFSET_MASK, RESERVED_SHIFT};

/// A 64-bit address in the UMI global address space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlobalAddr(pub u64);

impl GlobalAddr {
    /// Creates a new global address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Builds an address from a reserved selector byte, chip ID, and chiplet offset.
    ///
    /// Offset bits above bit 39 are discarded.
    ///
    /// # Arguments
    ///
    /// * `selector` - Value of the reserved top byte (0 for direct-attached topologies).
    /// * `chip_id` - Region selector placed in bits 55:40.
    /// * `offset` - Offset within the chiplet placed in bits 39:0.
    pub const fn compose(selector: u8, chip_id: u16, offset: u64) -> Self {
        Self(
            ((selector as u64) << RESERVED_SHIFT)
                | ((chip_id as u64) << CHIPID_SHIFT)
                | (offset & OFFSET_MASK),
        )
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(&self) -> u64 {
        self.0
    }

    /// Returns the reserved top byte (bits 63:56).
    pub const fn selector(&self) -> u8 {
        (self.0 >> RESERVED_SHIFT) as u8
    }

    /// Returns the chip ID / region ID (bits 55:40).
    pub const fn chip_id(&self) -> u16 {
        ((self.0 >> CHIPID_SHIFT) & CHIPID_MASK) as u16
    }

    /// Returns the offset within the chiplet (bits 39:0).
    pub const fn offset(&self) -> u64 {
        self.0 & OFFSET_MASK
    }
}

impl From<u64> for GlobalAddr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::Display for GlobalAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
