//! # Exit Device Tests
//!
//! Verifies exit-code decoding and publication through the shared exit flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rstest::rstest;
use umi_monitor_core::MonitorError;
use umi_monitor_core::soc::devices::{Device, ExitDevice};

const EXIT: u64 = 0x00CC_CC00_D000_0000;

fn exit_device() -> (ExitDevice, Arc<AtomicU64>) {
    let flag = Arc::new(AtomicU64::new(u64::MAX));
    (ExitDevice::new(EXIT, Arc::clone(&flag)), flag)
}

#[rstest]
#[case(&[0, 0, 0, 0], 0)]
#[case(&[42, 0, 0, 0], 42)]
#[case(&[0x78, 0x56, 0x34, 0x12], 0x1234_5678)]
#[case(&[0xFF, 0xFF, 0xFF, 0xFF], u32::MAX)]
fn decodes_little_endian_exit_code(#[case] payload: &[u8], #[case] code: u32) {
    let (mut dev, flag) = exit_device();
    dev.write(0, payload).unwrap();
    assert_eq!(flag.load(Ordering::Relaxed), u64::from(code));
}

#[test]
fn extra_payload_bytes_are_ignored() {
    let (mut dev, flag) = exit_device();
    dev.write(0, &[7, 0, 0, 0, 0xFF, 0xFF]).unwrap();
    assert_eq!(flag.load(Ordering::Relaxed), 7);
}

#[test]
fn short_payload_is_malformed() {
    let (mut dev, flag) = exit_device();
    assert_eq!(
        dev.write(0, &[1, 0]),
        Err(MonitorError::MalformedPayload {
            device: "EXIT",
            expected: 4,
            actual: 2
        })
    );
    assert_eq!(flag.load(Ordering::Relaxed), u64::MAX);
}

#[test]
fn reads_are_unsupported() {
    let (mut dev, _) = exit_device();
    assert!(matches!(
        dev.read(0, 4),
        Err(MonitorError::UnsupportedAccess { device: "EXIT", .. })
    ));
}
