//! # Statistics Tests
//!
//! Verifies the counters a run leaves behind and the report banner.

use pretty_assertions::assert_eq;
use umi_monitor_core::config::AddressMapConfig;
use umi_monitor_core::MonitorStats;

use crate::common::harness::{self, config_for};

#[test]
fn fresh_counters_are_zero() {
    let stats = MonitorStats::new();
    assert_eq!(stats.packets, 0);
    assert_eq!(stats.responses, 0);
    assert_eq!(stats.idle_polls, 0);
    assert!(stats.elapsed_secs() >= 0.0);
}

#[test]
fn run_counts_every_transaction_kind() {
    let map = AddressMapConfig::default();
    let mut packets = vec![
        harness::write(0x100, &[1, 2, 3, 4]),
        harness::read(0x100, 4),
    ];
    packets.extend(harness::print(&map, "ok"));
    packets.push(harness::exit(&map, 0));

    let (mut monitor, console) = harness::replay(&config_for(map), packets);
    assert_eq!(monitor.run().unwrap(), 0);
    assert_eq!(console.text(), "ok");

    let stats = monitor.stats();
    assert_eq!(stats.packets, 5);
    assert_eq!(stats.reads, 1);
    assert_eq!(stats.writes, 1);
    assert_eq!(stats.posted_writes, 3);
    assert_eq!(stats.bytes_read, 4);
    assert_eq!(stats.bytes_written, 4 + 2 + 4);
    assert_eq!(stats.console_bytes, 2);
    assert_eq!(stats.responses, 2);
}

#[test]
fn idle_polls_are_counted() {
    let (mut monitor, _console) = harness::monitor(&config_for(AddressMapConfig::default()));
    for _ in 0..3 {
        let _ = monitor.step().unwrap();
    }
    assert_eq!(monitor.stats().idle_polls, 3);
    assert_eq!(monitor.stats().packets, 0);
}

#[test]
fn report_lists_every_counter() {
    let mut stats = MonitorStats::new();
    stats.packets = 7;
    stats.console_bytes = 3;
    let report = stats.to_string();

    assert!(report.contains("UMI MONITOR STATISTICS"));
    for name in [
        "host_seconds",
        "packets          7",
        "reads",
        "writes",
        "posted_writes",
        "bytes_read",
        "bytes_written",
        "console_bytes    3",
        "responses",
        "idle_polls",
    ] {
        assert!(report.contains(name), "missing {name} in\n{report}");
    }
}
