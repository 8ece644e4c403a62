//! Memory Model Python binding.
//!
//! Exposes a standalone `Memory` so benches and scripts can build, seed, and inspect
//! program images without a transport.

use pyo3::prelude::*;
use pyo3::types::PyBytes;
use umi_monitor_core::soc::memory::Memory;

use crate::conversion::to_py_err;

/// Python-exposed Memory Model of a fixed capacity.
#[pyclass(name = "Memory")]
#[derive(Debug)]
pub struct PyMemory {
    inner: Memory,
}

#[pymethods]
impl PyMemory {
    /// Creates a zero-filled store of `size` bytes.
    #[new]
    fn new(size: usize) -> Self {
        Self {
            inner: Memory::new(size, 0),
        }
    }

    /// Capacity in bytes.
    fn __len__(&self) -> usize {
        self.inner.capacity()
    }

    /// Copies a program image into the store at `offset`.
    ///
    /// # Errors
    /// Returns a `RuntimeError` if the image does not fit.
    fn initialize(&mut self, offset: u64, data: Vec<u8>) -> PyResult<()> {
        self.inner.initialize(offset, &data).map_err(to_py_err)
    }

    /// Writes `data` at `offset`.
    fn write(&mut self, offset: u64, data: Vec<u8>) -> PyResult<()> {
        self.inner.write(offset, &data).map_err(to_py_err)
    }

    /// Reads `len` bytes starting at `offset`.
    fn read<'py>(&self, py: Python<'py>, offset: u64, len: usize) -> PyResult<Bound<'py, PyBytes>> {
        let data = self.inner.read(offset, len).map_err(to_py_err)?;
        Ok(PyBytes::new(py, &data))
    }
}
