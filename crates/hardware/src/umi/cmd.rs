//! UMI command word.
//!
//! The command is kept as an opaque 32-bit value. Fields are read through typed
//! accessors and the opcode is replaced with [`UmiCmd::with_opcode`], which
//! preserves every other bit, so no call site ever masks the word by hand.
//!
//! ```text
//!  31           23  22   21    16 15       8 7    5 4      0
//! +---------------+-----+--------+---------+------+--------+
//! |   host/flags  | EOM | qos/.. |   LEN   | SIZE | OPCODE |
//! +---------------+-----+--------+---------+------+--------+
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::opcode::Opcode;
use crate::common::constants::{
    EOM_BIT, LEN_MASK, LEN_SHIFT, MAX_BYTES_PER_WORD_COUNT, OPCODE_MASK, SIZE_MASK, SIZE_SHIFT,
};

/// A 32-bit UMI command word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UmiCmd(pub u32);

// LEN is the UMI field name.
#[allow(clippy::len_without_is_empty)]
impl UmiCmd {
    /// Builds a command from its opcode, SIZE, and LEN fields; all other bits are zero.
    ///
    /// # Arguments
    ///
    /// * `opcode` - Transaction opcode.
    /// * `size` - Log2 of the word size in bytes (truncated to 3 bits).
    /// * `len` - Number of words minus one.
    pub const fn new(opcode: Opcode, size: u32, len: u8) -> Self {
        Self(opcode.bits() | ((size & SIZE_MASK) << SIZE_SHIFT) | ((len as u32) << LEN_SHIFT))
    }

    /// Builds a byte-granular command describing a transfer of `nbytes` bytes.
    ///
    /// Returns `None` when `nbytes` is zero or larger than one command can describe.
    pub fn for_bytes(opcode: Opcode, nbytes: usize) -> Option<Self> {
        if nbytes == 0 || nbytes > MAX_BYTES_PER_WORD_COUNT {
            return None;
        }
        let len = u8::try_from(nbytes - 1).ok()?;
        Some(Self::new(opcode, 0, len))
    }

    /// Returns the raw command word.
    #[inline(always)]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Decodes the opcode from bits 4:0.
    pub const fn opcode(self) -> Opcode {
        Opcode::from_bits(self.0)
    }

    /// Returns a copy of this command with the opcode replaced and every other bit kept.
    pub const fn with_opcode(self, opcode: Opcode) -> Self {
        Self((self.0 & !OPCODE_MASK) | opcode.bits())
    }

    /// Log2 of the word size in bytes (bits 7:5).
    pub const fn size(self) -> u32 {
        (self.0 >> SIZE_SHIFT) & SIZE_MASK
    }

    /// Number of words minus one (bits 15:8).
    pub const fn len(self) -> u32 {
        (self.0 >> LEN_SHIFT) & LEN_MASK
    }

    /// End-of-message flag (bit 22).
    pub const fn eom(self) -> bool {
        (self.0 >> EOM_BIT) & 1 == 1
    }

    /// Number of bytes the command transfers: `(LEN + 1) << SIZE`.
    pub const fn num_bytes(self) -> usize {
        ((self.len() as usize) + 1) << self.size()
    }
}

impl From<u32> for UmiCmd {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for UmiCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} size={} len={} ({:#010x})",
            self.opcode(),
            self.size(),
            self.len(),
            self.0
        )
    }
}
