//! Shared test infrastructure.

/// Monitor construction, console capture, and packet builders.
pub mod harness;
