//! Dispatch loop and program loading.
//!
//! Provides the transaction dispatcher, its empty-poll strategy, and utilities for
//! reading the program image that seeds RAM.

/// Program image loading (raw binaries and ELF files).
pub mod loader;

/// Transaction dispatcher.
pub mod monitor;

/// Empty-poll wait strategies.
pub mod poll;

pub use monitor::{Monitor, MonitorState, Step};
pub use poll::{PollStrategy, Poller};
