//! Monitor statistics collection and reporting.
//!
//! Counts what the dispatcher did during one run: how many transactions of each
//! kind it serviced, how many bytes moved, and how often it polled an empty channel.

use std::fmt;
use std::time::Instant;

/// Per-run transaction counters.
#[derive(Clone, Debug)]
pub struct MonitorStats {
    start_time: Instant,
    /// Packets received and dispatched.
    pub packets: u64,
    /// `REQ_READ` transactions serviced.
    pub reads: u64,
    /// `REQ_WRITE` transactions serviced.
    pub writes: u64,
    /// `REQ_POSTED` transactions serviced.
    pub posted_writes: u64,
    /// Bytes returned in read responses.
    pub bytes_read: u64,
    /// Payload bytes committed by writes.
    pub bytes_written: u64,
    /// Characters emitted on the console.
    pub console_bytes: u64,
    /// Response packets handed to the transport.
    pub responses: u64,
    /// Polls that found no packet.
    pub idle_polls: u64,
}

impl MonitorStats {
    /// Creates zeroed counters; the wall clock starts now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            packets: 0,
            reads: 0,
            writes: 0,
            posted_writes: 0,
            bytes_read: 0,
            bytes_written: 0,
            console_bytes: 0,
            responses: 0,
            idle_polls: 0,
        }
    }

    /// Seconds elapsed since the counters were created.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }
}

impl Default for MonitorStats {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MonitorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "UMI MONITOR STATISTICS")?;
        writeln!(f, "==========================================================")?;
        writeln!(f, "  host_seconds     {:.4} s", self.elapsed_secs())?;
        writeln!(f, "  packets          {}", self.packets)?;
        writeln!(f, "  reads            {}", self.reads)?;
        writeln!(f, "  writes           {}", self.writes)?;
        writeln!(f, "  posted_writes    {}", self.posted_writes)?;
        writeln!(f, "  bytes_read       {}", self.bytes_read)?;
        writeln!(f, "  bytes_written    {}", self.bytes_written)?;
        writeln!(f, "  console_bytes    {}", self.console_bytes)?;
        writeln!(f, "  responses        {}", self.responses)?;
        write!(f, "  idle_polls       {}", self.idle_polls)
    }
}
