//! # Unit Components
//!
//! This module serves as the central hub for the unit tests, organized by the
//! crate layer they exercise.



/// Unit tests for the dispatch loop, polling, and program loading.
///
/// This module contains the end-to-end dispatcher tests that drive a monitor
/// through an in-memory transport and check responses, console output, and
/// termination.
pub mod sim;

/// Unit tests for the region table components.
///
/// This module organizes tests for RAM, the console and exit devices, the bus,
/// and the system builder.
pub mod soc;

/// Unit tests for per-run statistics.
pub mod stats;

/// Unit tests for UMI command words, opcodes, packets, and transports.
pub mod umi;
