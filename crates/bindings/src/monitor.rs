//! Monitor Python binding.
//!
//! Exposes the dispatcher to Python: create from the bench's queue object, a packet
//! factory, and an optional config dict; seed and inspect memory; step or run until
//! the program exits. Handles Python signal checks and stdout flush while idle.

use std::io::{self, Write};

use pyo3::prelude::*;
use pyo3::types::PyBytes;
use umi_monitor_core::sim::{Monitor, MonitorState, Step};
use umi_monitor_core::{MonitorError, MonitorResult};

use crate::conversion::{py_dict_to_config, to_py_err};
use crate::stats::PyStats;
use crate::transport::PyTransport;

/// Python-exposed monitor: wraps a `Monitor` over a Python queue transport.
#[pyclass(name = "Monitor", unsendable)]
#[derive(Debug)]
pub struct PyMonitor {
    /// The dispatcher.
    pub inner: Monitor<PyTransport>,
}

#[pymethods]
impl PyMonitor {
    /// Creates a monitor.
    ///
    /// # Arguments
    /// * `rx` - Object with `recv(blocking=False)` and `send(packet)` (e.g. a switchboard `UmiTxRx`).
    /// * `tx_factory` - Callable building outbound packets as `tx_factory(cmd, dstaddr, srcaddr[, data])`.
    /// * `config` - Optional configuration dict; `None` selects the direct-attached defaults.
    ///
    /// # Errors
    /// Returns a `ValueError` if the configuration is invalid.
    #[new]
    #[pyo3(signature = (rx, tx_factory, config=None))]
    fn new(
        py: Python<'_>,
        rx: Py<PyAny>,
        tx_factory: Py<PyAny>,
        config: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<Self> {
        let config = py_dict_to_config(py, config)?;
        let transport = PyTransport::new(rx, tx_factory);
        let inner = Monitor::new(&config, transport).map_err(to_py_err)?;
        Ok(Self { inner })
    }

    /// Seeds RAM with `data` at memory offset `offset`.
    ///
    /// # Errors
    /// Returns a `RuntimeError` if the image does not fit or RAM is not served.
    pub fn initialize_memory(&mut self, offset: u64, data: Vec<u8>) -> PyResult<()> {
        self.inner
            .initialize_memory(offset, &data)
            .map_err(to_py_err)
    }

    /// Reads `len` bytes of RAM starting at memory offset `offset`.
    ///
    /// # Errors
    /// Returns a `RuntimeError` if the range is out of bounds or RAM is not served.
    pub fn read_memory<'py>(
        &mut self,
        py: Python<'py>,
        offset: u64,
        len: usize,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let data = self.inner.read_memory(offset, len).map_err(to_py_err)?;
        Ok(PyBytes::new(py, &data))
    }

    /// Polls once and services at most one packet.
    ///
    /// # Returns
    ///
    /// `None` while running, or the exit code once the program has terminated.
    ///
    /// # Errors
    /// Returns a `RuntimeError` on a protocol violation or transport failure.
    pub fn step(&mut self) -> PyResult<Option<u32>> {
        match self.inner.step().map_err(to_py_err)? {
            Step::Idle | Step::Serviced => Ok(None),
            Step::Terminated(code) => {
                flush_console(&mut io::stdout()).map_err(to_py_err)?;
                Ok(Some(code))
            }
        }
    }

    /// Services packets until the program writes its exit code.
    ///
    /// Program output is written to the process's stdout file descriptor, not to
    /// Python's `sys.stdout`. `sys.stdout` is flushed before the loop starts so bench
    /// output printed earlier appears first; output redirected by replacing
    /// `sys.stdout` does not capture program output.
    ///
    /// Checks for Python signals (e.g., Ctrl-C) and flushes stdout on every empty poll.
    ///
    /// # Returns
    ///
    /// The exit code written by the program.
    ///
    /// # Errors
    /// Re-raises a pending Python signal exception, or returns a `RuntimeError` on a
    /// protocol violation, transport failure, or console flush failure.
    pub fn run(&mut self, py: Python<'_>) -> PyResult<u32> {
        flush_python_stdout(py)?;

        let mut interrupted: Option<PyErr> = None;
        let result = self.inner.run_with_hook(|| {
            flush_console(&mut io::stdout())?;
            py.check_signals().map_err(|e| {
                let message = e.to_string();
                interrupted = Some(e);
                MonitorError::Interrupted(message)
            })
        });

        match (result, interrupted) {
            (_, Some(err)) => Err(err),
            (Ok(code), None) => {
                flush_console(&mut io::stdout()).map_err(to_py_err)?;
                Ok(code)
            }
            (Err(err), None) => {
                let _ = io::stdout().flush();
                Err(to_py_err(err))
            }
        }
    }

    /// Whether the program has written its exit code.
    #[getter]
    pub fn terminated(&self) -> bool {
        matches!(self.inner.state(), MonitorState::Terminated(_))
    }

    /// Exit code written by the program, or `None` while running.
    #[getter]
    pub fn exit_code(&self) -> Option<u32> {
        match self.inner.state() {
            MonitorState::Running => None,
            MonitorState::Terminated(code) => Some(code),
        }
    }

    /// Returns a snapshot of the transaction counters.
    pub fn stats(&self) -> PyStats {
        PyStats::from(self.inner.stats().clone())
    }
}

/// Flushes program output, reporting failures instead of discarding them.
fn flush_console(out: &mut impl Write) -> MonitorResult<()> {
    out.flush()
        .map_err(|e| MonitorError::Output(format!("stdout flush failed: {e}")))
}

/// Flushes Python's `sys.stdout` when it is set.
fn flush_python_stdout(py: Python<'_>) -> PyResult<()> {
    let stdout = py.import("sys")?.getattr("stdout")?;
    if !stdout.is_none() {
        let _ = stdout.call_method0("flush")?;
    }
    Ok(())
}
