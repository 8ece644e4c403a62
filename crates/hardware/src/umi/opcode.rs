//! UMI opcodes.
//!
//! The opcode occupies bits 4:0 of the command word. Odd values are requests,
//! even non-zero values are responses.

use std::fmt;

use crate::common::constants::OPCODE_MASK;

/// Transaction opcode decoded from bits 4:0 of a UMI command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Invalid transaction.
    Invalid,
    /// Read request; answered with `RespRead` carrying the data.
    ReqRead,
    /// Write request; answered with a payload-less `RespWrite`.
    ReqWrite,
    /// Posted (fire-and-forget) write; never answered.
    ReqPosted,
    /// Remote DMA request.
    ReqRdma,
    /// Atomic read-modify-write request.
    ReqAtomic,
    /// User-defined request.
    ReqUser0,
    /// Reserved request.
    ReqFuture0,
    /// Error/link request.
    ReqError,
    /// Read response carrying data.
    RespRead,
    /// Write acknowledgement.
    RespWrite,
    /// User-defined response.
    RespUser0,
    /// User-defined response.
    RespUser1,
    /// Reserved response.
    RespFuture0,
    /// Reserved response.
    RespFuture1,
    /// Link-layer response.
    RespLink,
    /// Any other 5-bit value.
    Unknown(u8),
}

impl Opcode {
    /// Decodes an opcode from the low five bits of `raw`; higher bits are ignored.
    pub const fn from_bits(raw: u32) -> Self {
        match (raw & OPCODE_MASK) as u8 {
            0x00 => Self::Invalid,
            0x01 => Self::ReqRead,
            0x03 => Self::ReqWrite,
            0x05 => Self::ReqPosted,
            0x07 => Self::ReqRdma,
            0x09 => Self::ReqAtomic,
            0x0B => Self::ReqUser0,
            0x0D => Self::ReqFuture0,
            0x0F => Self::ReqError,
            0x02 => Self::RespRead,
            0x04 => Self::RespWrite,
            0x06 => Self::RespUser0,
            0x08 => Self::RespUser1,
            0x0A => Self::RespFuture0,
            0x0C => Self::RespFuture1,
            0x0E => Self::RespLink,
            other => Self::Unknown(other),
        }
    }

    /// Returns the 5-bit encoding of this opcode.
    pub const fn bits(self) -> u32 {
        let raw = match self {
            Self::Invalid => 0x00,
            Self::ReqRead => 0x01,
            Self::ReqWrite => 0x03,
            Self::ReqPosted => 0x05,
            Self::ReqRdma => 0x07,
            Self::ReqAtomic => 0x09,
            Self::ReqUser0 => 0x0B,
            Self::ReqFuture0 => 0x0D,
            Self::ReqError => 0x0F,
            Self::RespRead => 0x02,
            Self::RespWrite => 0x04,
            Self::RespUser0 => 0x06,
            Self::RespUser1 => 0x08,
            Self::RespFuture0 => 0x0A,
            Self::RespFuture1 => 0x0C,
            Self::RespLink => 0x0E,
            Self::Unknown(other) => other & (OPCODE_MASK as u8),
        };
        raw as u32
    }

    /// Returns `true` for the write-like requests whose data lands in the target.
    pub const fn is_write(self) -> bool {
        matches!(self, Self::ReqWrite | Self::ReqPosted)
    }

    /// Returns the UMI mnemonic, e.g. `UMI_REQ_READ`.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Invalid => "UMI_INVALID",
            Self::ReqRead => "UMI_REQ_READ",
            Self::ReqWrite => "UMI_REQ_WRITE",
            Self::ReqPosted => "UMI_REQ_POSTED",
            Self::ReqRdma => "UMI_REQ_RDMA",
            Self::ReqAtomic => "UMI_REQ_ATOMIC",
            Self::ReqUser0 => "UMI_REQ_USER0",
            Self::ReqFuture0 => "UMI_REQ_FUTURE0",
            Self::ReqError => "UMI_REQ_ERROR",
            Self::RespRead => "UMI_RESP_READ",
            Self::RespWrite => "UMI_RESP_WRITE",
            Self::RespUser0 => "UMI_RESP_USER0",
            Self::RespUser1 => "UMI_RESP_USER1",
            Self::RespFuture0 => "UMI_RESP_FUTURE0",
            Self::RespFuture1 => "UMI_RESP_FUTURE1",
            Self::RespLink => "UMI_RESP_LINK",
            Self::Unknown(_) => "UMI_UNKNOWN",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(raw) => write!(f, "UMI_UNKNOWN({raw:#04x})"),
            other => f.write_str(other.mnemonic()),
        }
    }
}
