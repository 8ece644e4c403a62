//! # Dispatcher Tests
//!
//! Verifies the per-packet dispatch algorithm: RAM reads and writes,
//! console output, termination, acknowledgement rules, and fatal protocol
//! violations, for both the direct-attached and crossbar-routed address maps.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use pretty_assertions::assert_eq;
use rstest::rstest;
use umi_monitor_core::config::AddressMapConfig;
use umi_monitor_core::umi::{Opcode, QueueTransport, UmiCmd, UmiPacket};
use umi_monitor_core::{Monitor, MonitorError, MonitorState, Step};

use crate::common::harness::{
    config_for, exit, monitor, posted, print, read, replay, write, HOST,
};
use crate::common::mocks::transport::MockUmiLink;

fn direct() -> AddressMapConfig {
    AddressMapConfig::direct()
}

fn crossbar() -> AddressMapConfig {
    AddressMapConfig::crossbar(0x01)
}

// ══════════════════════════════════════════════════════════
// 1. RAM
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::direct(direct())]
#[case::crossbar(crossbar())]
fn read_returns_initialized_bytes(#[case] map: AddressMapConfig) {
    let (mut mon, _) = monitor(&config_for(map.clone()));
    mon.initialize_memory(0, &[0x13, 0x05, 0x00, 0x00]).unwrap();

    let request = read(map.ram_base(), 4);
    let response = mon.service(&request).unwrap().unwrap();

    assert_eq!(response.opcode(), Opcode::RespRead);
    assert_eq!(response.dstaddr, HOST);
    assert_eq!(response.srcaddr, map.ram_base());
    assert_eq!(response.data, vec![0x13, 0x05, 0x00, 0x00]);
    assert_eq!(response.cmd, request.cmd.with_opcode(Opcode::RespRead));
}

#[rstest]
#[case::direct(direct())]
#[case::crossbar(crossbar())]
fn write_is_acknowledged_and_committed(#[case] map: AddressMapConfig) {
    let (mut mon, _) = monitor(&config_for(map.clone()));
    let request = write(map.ram_base() + 0x100, &[0xEF, 0xBE, 0xAD, 0xDE]);

    let ack = mon.service(&request).unwrap().unwrap();
    assert_eq!(ack.opcode(), Opcode::RespWrite);
    assert_eq!(ack.dstaddr, HOST);
    assert_eq!(ack.srcaddr, map.ram_base() + 0x100);
    assert!(ack.data.is_empty());

    assert_eq!(
        mon.read_memory(0x100, 4).unwrap(),
        vec![0xEF, 0xBE, 0xAD, 0xDE]
    );
}

#[test]
fn posted_write_is_committed_without_response() {
    let (mut mon, _) = monitor(&config_for(direct()));
    assert_eq!(mon.service(&posted(0x200, &[7, 8])).unwrap(), None);
    assert_eq!(mon.read_memory(0x200, 2).unwrap(), vec![7, 8]);
}

#[test]
fn read_length_follows_size_and_len_fields() {
    let (mut mon, _) = monitor(&config_for(direct()));
    mon.initialize_memory(0, &(0u8..16).collect::<Vec<_>>()).unwrap();

    // SIZE=2 (4-byte words), LEN=1 (two words)
    let request = UmiPacket::new(UmiCmd::new(Opcode::ReqRead, 2, 1), 0, HOST, Vec::new());
    let response = mon.service(&request).unwrap().unwrap();
    assert_eq!(response.data, (0u8..8).collect::<Vec<_>>());
}

#[test]
fn read_past_end_of_ram_is_fatal() {
    let (mut mon, _) = monitor(&config_for(direct()));
    assert_eq!(
        mon.service(&read(0x7FFE, 4)),
        Err(MonitorError::OutOfBounds {
            offset: 0x7FFE,
            len: 4,
            capacity: 0x8000
        })
    );
}

#[test]
fn response_preserves_non_opcode_command_bits() {
    let (mut mon, _) = monitor(&config_for(direct()));
    let cmd = UmiCmd(0x00C0_0301);
    let response = mon
        .service(&UmiPacket::new(cmd, 0x10, HOST, Vec::new()))
        .unwrap()
        .unwrap();
    assert_eq!(response.cmd.raw(), 0x00C0_0302);
}

// ══════════════════════════════════════════════════════════
// 2. Console
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::direct(direct())]
#[case::crossbar(crossbar())]
fn console_write_prints_and_acks(#[case] map: AddressMapConfig) {
    let (mut mon, out) = monitor(&config_for(map.clone()));
    let ack = mon.service(&write(map.uart_addr(), &[0x41])).unwrap().unwrap();

    assert_eq!(out.text(), "A");
    assert_eq!(ack.opcode(), Opcode::RespWrite);
    assert_eq!(ack.dstaddr, HOST);
    assert_eq!(ack.srcaddr, map.uart_addr());
}

#[test]
fn posted_console_write_prints_without_response() {
    let map = direct();
    let (mut mon, out) = monitor(&config_for(map.clone()));
    assert_eq!(mon.service(&posted(map.uart_addr(), b"B")).unwrap(), None);
    assert_eq!(out.text(), "B");
    assert_eq!(mon.stats().console_bytes, 1);
}

#[test]
fn console_read_is_fatal() {
    let map = direct();
    let (mut mon, _) = monitor(&config_for(map.clone()));
    let err = mon.service(&read(map.uart_addr(), 1)).unwrap_err();
    assert_eq!(
        err,
        MonitorError::UnsupportedAccess {
            device: "UART",
            opcode: Opcode::ReqRead,
            address: map.uart_addr()
        }
    );
    assert!(err.is_protocol_violation());
}

// ══════════════════════════════════════════════════════════
// 3. Termination
// ══════════════════════════════════════════════════════════

#[rstest]
#[case::posted(Opcode::ReqPosted)]
#[case::acknowledged(Opcode::ReqWrite)]
fn exit_write_terminates_without_response(#[case] opcode: Opcode) {
    let map = direct();
    let (mut mon, _) = monitor(&config_for(map.clone()));
    let request = UmiPacket::write_request(opcode, map.exit_addr(), HOST, vec![0x2A, 0, 0, 0])
        .unwrap();

    assert_eq!(mon.service(&request).unwrap(), None);
    assert_eq!(mon.state(), MonitorState::Terminated(42));
}

#[rstest]
#[case::direct(direct())]
#[case::crossbar(crossbar())]
fn run_prints_then_exits_with_code(#[case] map: AddressMapConfig) {
    let mut packets = print(&map, "Hi\n");
    packets.push(exit(&map, 42));
    packets.push(write(map.ram_base(), &[0xFF]));

    let (mut mon, out) = replay(&config_for(map), packets);
    assert_eq!(mon.run(), Ok(42));
    assert_eq!(out.text(), "Hi\n");
    // Packets after termination are never received.
    assert_eq!(mon.transport().pending(), 1);
    assert!(mon.transport().sent().is_empty());
}

#[test]
fn output_before_exit_is_flushed() {
    let map = direct();
    let (mut mon, out) = replay(
        &config_for(map.clone()),
        vec![posted(map.uart_addr(), b"A"), exit(&map, 42)],
    );
    assert_eq!(mon.run(), Ok(42));
    assert_eq!(out.text(), "A");
}

#[test]
fn stepping_a_terminated_monitor_does_not_poll() {
    let map = direct();
    let (mut mon, _) = replay(&config_for(map.clone()), vec![exit(&map, 3)]);
    assert_eq!(mon.step(), Ok(Step::Terminated(3)));
    // The replay transport is now empty and closed; polling it would fail.
    assert_eq!(mon.step(), Ok(Step::Terminated(3)));
}

#[test]
fn exit_read_with_code_terminates_without_response() {
    let map = direct();
    let (mut mon, _) = monitor(&config_for(map.clone()));
    let cmd = UmiCmd::new(Opcode::ReqRead, 2, 0);
    let request = UmiPacket::new(cmd, map.exit_addr(), HOST, vec![0x07, 0, 0, 0]);

    assert_eq!(mon.service(&request), Ok(None));
    assert_eq!(mon.state(), MonitorState::Terminated(7));
}

#[test]
fn exit_read_without_code_is_fatal() {
    let map = direct();
    let (mut mon, _) = monitor(&config_for(map.clone()));
    assert_eq!(
        mon.service(&read(map.exit_addr(), 4)),
        Err(MonitorError::MalformedPayload {
            device: "EXIT",
            expected: 4,
            actual: 0
        })
    );
    assert_eq!(mon.state(), MonitorState::Running);
}

/// Console sink whose `flush` fails once `broken` is set.
struct BrokenFlush {
    broken: Arc<AtomicBool>,
}

impl Write for BrokenFlush {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.broken.load(Ordering::Relaxed) {
            Err(io::Error::other("pipe closed"))
        } else {
            Ok(())
        }
    }
}

#[test]
fn failed_flush_on_exit_keeps_exit_code() {
    let map = direct();
    let broken = Arc::new(AtomicBool::new(false));
    let sink = BrokenFlush {
        broken: Arc::clone(&broken),
    };
    let mut mon =
        Monitor::with_console(&config_for(map.clone()), QueueTransport::new(), Box::new(sink))
            .unwrap();

    broken.store(true, Ordering::Relaxed);
    let err = mon.service(&exit(&map, 9)).unwrap_err();
    assert!(matches!(err, MonitorError::Output(_)));
    assert_eq!(mon.state(), MonitorState::Terminated(9));
    assert_eq!(mon.step(), Ok(Step::Terminated(9)));
}

#[test]
fn short_exit_payload_is_fatal() {
    let map = direct();
    let (mut mon, _) = monitor(&config_for(map.clone()));
    assert!(matches!(
        mon.service(&posted(map.exit_addr(), &[1])),
        Err(MonitorError::MalformedPayload { device: "EXIT", .. })
    ));
    assert_eq!(mon.state(), MonitorState::Running);
}

// ══════════════════════════════════════════════════════════
// 4. Protocol violations
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(Opcode::ReqAtomic)]
#[case(Opcode::ReqRdma)]
#[case(Opcode::RespRead)]
#[case(Opcode::Invalid)]
fn unsupported_opcode_is_fatal(#[case] opcode: Opcode) {
    let (mut mon, _) = monitor(&config_for(direct()));
    let packet = UmiPacket::new(UmiCmd::new(opcode, 0, 3), 0, HOST, vec![0; 4]);
    assert_eq!(
        mon.service(&packet),
        Err(MonitorError::UnsupportedOpcode(opcode))
    );
    assert_eq!(mon.read_memory(0, 4).unwrap(), vec![0; 4]);
}

#[test]
fn unmapped_address_is_fatal() {
    let (mut mon, _) = monitor(&config_for(direct()));
    let err = mon.service(&write(0xAAAA << 40, &[1])).unwrap_err();
    assert_eq!(err, MonitorError::UnsupportedAddress(0xAAAA << 40));
    assert!(err.to_string().contains("0x00aaaa0000000000"));
}

#[test]
fn crossbar_monitor_rejects_direct_addresses() {
    let (mut mon, out) = monitor(&config_for(crossbar()));
    let uart = direct().uart_addr();
    assert_eq!(
        mon.service(&posted(uart, b"A")),
        Err(MonitorError::UnsupportedAddress(uart))
    );
    assert!(out.bytes().is_empty());
}

#[test]
fn crossbar_monitor_serves_ram_in_region_zero() {
    let (mut mon, _) = monitor(&config_for(crossbar()));
    mon.initialize_memory(0, &[1, 2, 3, 4]).unwrap();

    let response = mon.service(&read(0x0, 4)).unwrap().unwrap();
    assert_eq!(response.data, vec![1, 2, 3, 4]);

    let prefixed = 0x0100_0000_0000_0000;
    assert_eq!(
        mon.service(&read(prefixed, 4)),
        Err(MonitorError::UnsupportedAddress(prefixed))
    );
}

#[test]
fn run_surfaces_violation_from_trace() {
    let map = direct();
    let (mut mon, _) = replay(
        &config_for(map.clone()),
        vec![posted(map.uart_addr(), b"x"), read(0xAAAA << 40, 1)],
    );
    assert_eq!(mon.run(), Err(MonitorError::UnsupportedAddress(0xAAAA << 40)));
}

#[test]
fn trace_ending_before_exit_reports_closed_transport() {
    let map = direct();
    let (mut mon, _) = replay(&config_for(map.clone()), print(&map, "no exit"));
    assert_eq!(mon.run(), Err(MonitorError::TransportClosed));
    assert_eq!(mon.state(), MonitorState::Running);
}

// ══════════════════════════════════════════════════════════
// 5. Transport interaction
// ══════════════════════════════════════════════════════════

#[test]
fn step_sends_exactly_one_response_per_request() {
    let (mut mon, _) = monitor(&config_for(direct()));
    mon.transport_mut().push(write(0x20, &[1]));
    mon.transport_mut().push(read(0x20, 1));

    assert_eq!(mon.step(), Ok(Step::Serviced));
    assert_eq!(mon.transport().sent().len(), 1);
    assert_eq!(mon.step(), Ok(Step::Serviced));
    assert_eq!(mon.step(), Ok(Step::Idle));

    let sent = mon.into_transport().take_sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].opcode(), Opcode::RespWrite);
    assert_eq!(sent[1].data, vec![1]);
}

#[test]
fn idle_hook_runs_on_every_empty_poll() {
    let (mut mon, _) = monitor(&config_for(direct()));
    let mut idle = 0;
    let result = mon.run_with_hook(|| {
        idle += 1;
        if idle == 5 {
            Err(MonitorError::Interrupted("stop".into()))
        } else {
            Ok(())
        }
    });
    assert_eq!(result, Err(MonitorError::Interrupted("stop".into())));
    assert_eq!(idle, 5);
    assert_eq!(mon.stats().idle_polls, 5);
}

#[test]
fn idle_hook_error_stops_run() {
    let (mut mon, _) = monitor(&config_for(direct()));
    let result = mon.run_with_hook(|| Err(MonitorError::Interrupted("SIGINT".into())));
    assert_eq!(result, Err(MonitorError::Interrupted("SIGINT".into())));
    assert_eq!(mon.stats().idle_polls, 1);
}

#[test]
fn send_failure_is_propagated() {
    let mut link = MockUmiLink::new();
    let _ = link
        .expect_try_recv()
        .times(1)
        .returning(|| Ok(Some(read(0, 4))));
    let _ = link
        .expect_send()
        .times(1)
        .returning(|_| Err(MonitorError::Transport("queue full".into())));

    let mut mon = umi_monitor_core::Monitor::with_console(
        &config_for(direct()),
        link,
        Box::new(std::io::sink()),
    )
    .unwrap();
    assert_eq!(
        mon.step(),
        Err(MonitorError::Transport("queue full".into()))
    );
}

#[test]
fn posted_traffic_never_reaches_send() {
    let map = direct();
    let mut link = MockUmiLink::new();
    let mut inbound = vec![exit(&map, 0), posted(0x10, &[1]), posted(map.uart_addr(), b"z")];
    let _ = link
        .expect_try_recv()
        .times(3)
        .returning(move || Ok(inbound.pop()));
    let _ = link.expect_send().never();

    let mut mon = umi_monitor_core::Monitor::with_console(
        &config_for(map),
        link,
        Box::new(std::io::sink()),
    )
    .unwrap();
    assert_eq!(mon.run(), Ok(0));
    assert_eq!(mon.stats().posted_writes, 3);
}
