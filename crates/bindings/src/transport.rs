//! Transport over Python queue objects.
//!
//! Adapts any Python object with `recv(blocking=False)` and `send(packet)` (such as a
//! switchboard `UmiTxRx`) to the core `Transport` trait. Outbound packets are built by a
//! Python factory called as `tx_factory(cmd, dstaddr, srcaddr)` or, when the packet
//! carries data, `tx_factory(cmd, dstaddr, srcaddr, data)`.

use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyDict};
use umi_monitor_core::umi::{Transport, UmiCmd, UmiPacket};
use umi_monitor_core::{MonitorError, MonitorResult};

/// Core transport backed by a Python receive/send object and a packet factory.
#[derive(Debug)]
pub struct PyTransport {
    rx: Py<PyAny>,
    tx_factory: Py<PyAny>,
}

impl PyTransport {
    /// Wraps a Python queue object and outbound packet factory.
    pub const fn new(rx: Py<PyAny>, tx_factory: Py<PyAny>) -> Self {
        Self { rx, tx_factory }
    }

    fn recv(&self, py: Python<'_>) -> PyResult<Option<UmiPacket>> {
        let kwargs = PyDict::new(py);
        kwargs.set_item("blocking", false)?;
        let obj = self.rx.bind(py).call_method("recv", (), Some(&kwargs))?;
        if obj.is_none() {
            return Ok(None);
        }

        let cmd: u32 = obj.getattr("cmd")?.extract()?;
        let dstaddr: u64 = obj.getattr("dstaddr")?.extract()?;
        let srcaddr: u64 = obj.getattr("srcaddr")?.extract()?;
        let data = if obj.hasattr("data")? {
            let data = obj.getattr("data")?;
            if data.is_none() {
                Vec::new()
            } else {
                extract_bytes(&data)?
            }
        } else {
            Vec::new()
        };

        Ok(Some(UmiPacket::new(UmiCmd(cmd), dstaddr, srcaddr, data)))
    }

    fn send_packet(&self, py: Python<'_>, packet: &UmiPacket) -> PyResult<()> {
        let factory = self.tx_factory.bind(py);
        let cmd = packet.cmd.raw();
        let tx = if packet.data.is_empty() {
            factory.call1((cmd, packet.dstaddr, packet.srcaddr))?
        } else {
            let data = payload_object(py, &packet.data)?;
            factory.call1((cmd, packet.dstaddr, packet.srcaddr, data))?
        };
        let _ = self.rx.bind(py).call_method1("send", (tx,))?;
        Ok(())
    }
}

impl Transport for PyTransport {
    fn try_recv(&mut self) -> MonitorResult<Option<UmiPacket>> {
        Python::with_gil(|py| self.recv(py)).map_err(|e| MonitorError::Transport(e.to_string()))
    }

    fn send(&mut self, packet: UmiPacket) -> MonitorResult<()> {
        Python::with_gil(|py| self.send_packet(py, &packet))
            .map_err(|e| MonitorError::Transport(e.to_string()))
    }
}

/// Reads packet data from a numpy array (via `tobytes()`), `bytes`, or a sequence of ints.
fn extract_bytes(data: &Bound<'_, PyAny>) -> PyResult<Vec<u8>> {
    if data.hasattr("tobytes")? {
        data.call_method0("tobytes")?.extract()
    } else {
        data.extract()
    }
}

/// Builds the data argument for the packet factory: a `uint8` numpy array when numpy is
/// importable, otherwise `bytes`.
fn payload_object<'py>(py: Python<'py>, data: &[u8]) -> PyResult<Bound<'py, PyAny>> {
    let bytes = PyBytes::new(py, data);
    match py.import("numpy") {
        Ok(numpy) => numpy.call_method1("frombuffer", (bytes, "uint8")),
        Err(_) => Ok(bytes.into_any()),
    }
}
