//! Python bindings for the UMI monitor.
//!
//! This crate exposes the monitor to a Python-hosted test bench via PyO3. It provides:
//! 1. **Monitor:** `Monitor` drives the dispatcher over the bench's own queue objects.
//! 2. **Memory:** `Memory` wraps a standalone Memory Model for scripting and checks.
//! 3. **Statistics:** `MonitorStats` for per-run counters.
//! 4. **Utilities:** Version string and `tracing` subscriber installation.

use pyo3::prelude::*;

/// Python dict to Rust `Config` conversion and error mapping.
pub mod conversion;
/// Memory binding (`Memory`).
pub mod memory;
/// Monitor binding (`Monitor`).
pub mod monitor;
/// Statistics binding (`MonitorStats`).
pub mod stats;
/// Transport over Python queue objects.
pub mod transport;
/// Utility functions (version, logging).
pub mod utils;

/// Registers all monitor classes and functions onto the given Python module.
///
/// # Arguments
///
/// * `m` - The Python module to register types and functions on.
///
/// # Returns
///
/// `Ok(())` on success, or a `PyErr` if registration fails.
pub fn register_monitor_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<monitor::PyMonitor>()?;
    m.add_class::<memory::PyMemory>()?;
    m.add_class::<stats::PyStats>()?;

    m.add_function(wrap_pyfunction!(utils::version, m)?)?;
    m.add_function(wrap_pyfunction!(utils::init_logging, m)?)?;

    Ok(())
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    register_monitor_module(m)?;
    Ok(())
}
