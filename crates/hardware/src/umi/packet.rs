//! UMI transaction packets.
//!
//! A packet is immutable once received. Responses are always freshly built by
//! [`UmiPacket::respond`], never patched in place.

use serde::{Deserialize, Serialize};

use super::cmd::UmiCmd;
use super::opcode::Opcode;
use crate::common::GlobalAddr;

/// One UMI bus transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UmiPacket {
    /// Command word (opcode plus protocol metadata).
    pub cmd: UmiCmd,
    /// Destination global address.
    pub dstaddr: u64,
    /// Source global address; responses are sent here.
    pub srcaddr: u64,
    /// Payload: write data on requests, read data on read responses.
    #[serde(default)]
    pub data: Vec<u8>,
}

impl UmiPacket {
    /// Creates a packet from its four fields.
    pub fn new(cmd: UmiCmd, dstaddr: u64, srcaddr: u64, data: Vec<u8>) -> Self {
        Self {
            cmd,
            dstaddr,
            srcaddr,
            data,
        }
    }

    /// Builds a byte-granular read request for `nbytes` bytes at `dstaddr`.
    ///
    /// Returns `None` if `nbytes` cannot be described by one command.
    pub fn read_request(dstaddr: u64, srcaddr: u64, nbytes: usize) -> Option<Self> {
        let cmd = UmiCmd::for_bytes(Opcode::ReqRead, nbytes)?;
        Some(Self::new(cmd, dstaddr, srcaddr, Vec::new()))
    }

    /// Builds a byte-granular write request (`ReqWrite` or `ReqPosted`) carrying `data`.
    ///
    /// Returns `None` if `data` is empty or longer than one command can describe.
    pub fn write_request(
        opcode: Opcode,
        dstaddr: u64,
        srcaddr: u64,
        data: Vec<u8>,
    ) -> Option<Self> {
        let cmd = UmiCmd::for_bytes(opcode, data.len())?;
        Some(Self::new(cmd, dstaddr, srcaddr, data))
    }

    /// Decoded opcode of this packet.
    pub const fn opcode(&self) -> Opcode {
        self.cmd.opcode()
    }

    /// Destination as a typed global address.
    pub const fn destination(&self) -> GlobalAddr {
        GlobalAddr::new(self.dstaddr)
    }

    /// Builds the response to this request.
    ///
    /// The response command is this packet's command with the opcode replaced, and the
    /// source and destination addresses are swapped.
    pub fn respond(&self, opcode: Opcode, data: Vec<u8>) -> Self {
        Self {
            cmd: self.cmd.with_opcode(opcode),
            dstaddr: self.srcaddr,
            srcaddr: self.dstaddr,
            data,
        }
    }
}
