//! UMI bit-field constants.
//!
//! Field positions for the global address and the command word, shared by the
//! address decoder, the command accessors, and the configuration validator.

/// Bit position of the chip ID field in a global address.
pub const CHIPID_SHIFT: u32 = 40;

/// Width mask of the chip ID field (16 bits) after shifting.
pub const CHIPID_MASK: u64 = 0xFFFF;

/// Bit position of the reserved selector byte in a global address.
pub const RESERVED_SHIFT: u32 = 56;

/// Mask selecting the 40-bit chiplet offset of a global address.
pub const OFFSET_MASK: u64 = (1 << CHIPID_SHIFT) - 1;

/// Mask of the opcode field (bits 4:0) of a command word.
pub const OPCODE_MASK: u32 = 0x1F;

/// Bit position of the SIZE field (bits 7:5) of a command word.
pub const SIZE_SHIFT: u32 = 5;

/// Width mask of the SIZE field after shifting.
pub const SIZE_MASK: u32 = 0x7;

/// Bit position of the LEN field (bits 15:8) of a command word.
pub const LEN_SHIFT: u32 = 8;

/// Width mask of the LEN field after shifting.
pub const LEN_MASK: u32 = 0xFF;

/// Bit position of the end-of-message flag of a command word.
pub const EOM_BIT: u32 = 22;

/// Largest transfer a single size-0 command can describe (LEN + 1 words of one byte).
pub const MAX_BYTES_PER_WORD_COUNT: usize = (LEN_MASK as usize) + 1;

/// Sentinel stored in the exit request while no termination has been observed.
pub const NO_EXIT: u64 = u64::MAX;
