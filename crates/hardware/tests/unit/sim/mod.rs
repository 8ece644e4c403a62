//! Dispatch loop tests.

/// Request/response properties checked over generated traffic.
pub mod dispatch_properties;


/// Dispatcher behaviour per region and opcode.
pub mod monitor;
