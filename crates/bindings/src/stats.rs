//! Statistics Python binding.
//!
//! Exposes per-run transaction counters to Python: getters, `to_dict` for
//! JSON-serializable export, and `str()` for the end-of-run summary.

use pyo3::prelude::*;
use pyo3::types::PyDict;
use umi_monitor_core::stats::MonitorStats;

/// Python-exposed statistics: a snapshot of `MonitorStats`.
#[pyclass(name = "MonitorStats")]
#[derive(Clone, Debug)]
pub struct PyStats {
    /// Counters at the time of the snapshot.
    pub inner: MonitorStats,
}

#[pymethods]
impl PyStats {
    #[getter]
    fn packets(&self) -> u64 {
        self.inner.packets
    }
    #[getter]
    fn reads(&self) -> u64 {
        self.inner.reads
    }
    #[getter]
    fn writes(&self) -> u64 {
        self.inner.writes
    }
    #[getter]
    fn posted_writes(&self) -> u64 {
        self.inner.posted_writes
    }
    #[getter]
    fn bytes_read(&self) -> u64 {
        self.inner.bytes_read
    }
    #[getter]
    fn bytes_written(&self) -> u64 {
        self.inner.bytes_written
    }
    #[getter]
    fn console_bytes(&self) -> u64 {
        self.inner.console_bytes
    }
    #[getter]
    fn responses(&self) -> u64 {
        self.inner.responses
    }
    #[getter]
    fn idle_polls(&self) -> u64 {
        self.inner.idle_polls
    }

    /// Export all counters as a Python dict.
    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let d = PyDict::new(py);
        let s = &self.inner;
        d.set_item("host_seconds", s.elapsed_secs())?;
        d.set_item("packets", s.packets)?;
        d.set_item("reads", s.reads)?;
        d.set_item("writes", s.writes)?;
        d.set_item("posted_writes", s.posted_writes)?;
        d.set_item("bytes_read", s.bytes_read)?;
        d.set_item("bytes_written", s.bytes_written)?;
        d.set_item("console_bytes", s.console_bytes)?;
        d.set_item("responses", s.responses)?;
        d.set_item("idle_polls", s.idle_polls)?;
        Ok(d)
    }

    fn __str__(&self) -> String {
        self.inner.to_string()
    }
}

impl From<MonitorStats> for PyStats {
    fn from(inner: MonitorStats) -> Self {
        Self { inner }
    }
}
