//! Utility functions exposed to Python.
//!
//! Provides the version string and `tracing` subscriber installation for the `_core` module.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use tracing_subscriber::EnvFilter;

/// Returns the monitor version string.
///
/// # Returns
///
/// The crate version, such as `"0.3.0"`.
#[pyfunction]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Installs a `tracing` subscriber that writes monitor logs to stderr.
///
/// Console output from the simulated program goes to stdout, so logs never interleave
/// with it. Calling this more than once keeps the first subscriber.
///
/// # Arguments
///
/// * `filter` - An `EnvFilter` directive such as `"warn"` or `"umi_monitor_core=debug"`.
///
/// # Returns
///
/// `True` if this call installed the subscriber.
///
/// # Errors
///
/// Returns a `ValueError` if `filter` is not a valid directive.
#[pyfunction]
#[pyo3(signature = (filter="warn"))]
pub fn init_logging(filter: &str) -> PyResult<bool> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| PyValueError::new_err(format!("Invalid log filter: {e}")))?;
    Ok(tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok())
}
