//! Region table tests.



/// Termination device.
pub mod exit;
