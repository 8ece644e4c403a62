//! Python↔Rust conversion helpers.
//!
//! Converts Python dicts into the core `Config` type via JSON serialization, so the
//! same schema is used from both Python and the CLI, and maps `MonitorError` onto
//! Python exception types.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use umi_monitor_core::config::Config;
use umi_monitor_core::MonitorError;

/// Converts a Python dict to a monitor `Config`.
///
/// The dict is serialized to JSON and then parsed with `Config::from_json`, which also
/// validates it. `None` yields the default configuration.
///
/// # Arguments
///
/// * `py` - Python interpreter handle.
/// * `dict` - A Python dict with `address_map`, `poll`, and `console` keys, or `None`.
///
/// # Returns
///
/// The deserialized `Config`, or a `ValueError` if the dict is invalid.
pub fn py_dict_to_config(py: Python<'_>, dict: Option<&Bound<'_, PyAny>>) -> PyResult<Config> {
    let Some(dict) = dict.filter(|d| !d.is_none()) else {
        return Ok(Config::default());
    };

    let json = py.import("json")?;
    let dumps = json.getattr("dumps")?;
    let json_str: String = dumps.call1((dict,))?.extract()?;

    Config::from_json(&json_str).map_err(to_py_err)
}

/// Maps a core error onto the closest Python exception.
///
/// Configuration problems raise `ValueError`; everything else (protocol violations,
/// bounds violations, transport failures) raises `RuntimeError`.
pub fn to_py_err(err: MonitorError) -> PyErr {
    match err {
        MonitorError::Config(_) => PyValueError::new_err(err.to_string()),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}
