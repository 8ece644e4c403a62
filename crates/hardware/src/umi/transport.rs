//! Packet transport seam.
//!
//! The queue mechanism that carries packets between the RTL simulation and this
//! monitor lives outside the crate. The dispatcher only sees the [`Transport`] trait:
//! a non-blocking receive and a send. [`QueueTransport`] is the in-memory
//! implementation used for trace replay and tests.

use std::collections::VecDeque;

use super::packet::UmiPacket;
use crate::common::{MonitorError, MonitorResult};

/// Bidirectional, non-blocking packet channel.
pub trait Transport {
    /// Returns the next inbound packet, or `Ok(None)` if none is available right now.
    ///
    /// Must not block.
    fn try_recv(&mut self) -> MonitorResult<Option<UmiPacket>>;

    /// Hands a packet to the transport for delivery.
    fn send(&mut self, packet: UmiPacket) -> MonitorResult<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn try_recv(&mut self) -> MonitorResult<Option<UmiPacket>> {
        (**self).try_recv()
    }

    fn send(&mut self, packet: UmiPacket) -> MonitorResult<()> {
        (**self).send(packet)
    }
}

/// In-memory transport backed by two FIFOs.
///
/// While open, an empty inbound queue is a normal empty poll. Once closed, an empty
/// inbound queue reports [`MonitorError::TransportClosed`] so a replay that ends
/// before the program terminates is surfaced instead of polling forever.
#[derive(Debug, Default)]
pub struct QueueTransport {
    inbound: VecDeque<UmiPacket>,
    outbound: Vec<UmiPacket>,
    closed: bool,
}

impl QueueTransport {
    /// Creates an empty, open transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a closed transport that will deliver exactly `packets`, in order.
    pub fn replay(packets: impl IntoIterator<Item = UmiPacket>) -> Self {
        Self {
            inbound: packets.into_iter().collect(),
            outbound: Vec::new(),
            closed: true,
        }
    }

    /// Queues a packet for the dispatcher to receive.
    pub fn push(&mut self, packet: UmiPacket) {
        self.inbound.push_back(packet);
    }

    /// Marks the inbound side closed.
    pub const fn close(&mut self) {
        self.closed = true;
    }

    /// Number of inbound packets not yet received.
    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    /// Packets sent so far, oldest first.
    pub fn sent(&self) -> &[UmiPacket] {
        &self.outbound
    }

    /// Removes and returns every packet sent so far.
    pub fn take_sent(&mut self) -> Vec<UmiPacket> {
        std::mem::take(&mut self.outbound)
    }
}

impl Transport for QueueTransport {
    fn try_recv(&mut self) -> MonitorResult<Option<UmiPacket>> {
        match self.inbound.pop_front() {
            Some(packet) => Ok(Some(packet)),
            None if self.closed => Err(MonitorError::TransportClosed),
            None => Ok(None),
        }
    }

    fn send(&mut self, packet: UmiPacket) -> MonitorResult<()> {
        self.outbound.push(packet);
        Ok(())
    }
}
