//! Universal Memory Interface (UMI) protocol types.
//!
//! This module models the request/response protocol spoken on the monitored channel:
//! 1. **Opcodes:** The closed set of transaction types.
//! 2. **Commands:** Typed access to the 32-bit command word.
//! 3. **Packets:** Transactions and response construction.
//! 4. **Transport:** The non-blocking channel the dispatcher polls.

/// Typed UMI command word.
pub mod cmd;

/// UMI opcode definitions.
pub mod opcode;

/// Transaction packets.
pub mod packet;

/// Transport trait and the in-memory queue transport.
pub mod transport;

pub use cmd::UmiCmd;
pub use opcode::Opcode;
pub use packet::UmiPacket;
pub use transport::{QueueTransport, Transport};
