//! # Dispatch Property Tests
//!
//! Verifies the request/response invariants over generated RAM traffic:
//! address swapping, read-after-write, read idempotence, and the rule that
//! posted writes never produce a response.

use proptest::prelude::*;
use umi_monitor_core::config::AddressMapConfig;
use umi_monitor_core::umi::Opcode;

use crate::common::harness::{config_for, monitor, posted, read, write, HOST};

const RAM_SIZE: u64 = 32768;

fn offset_and_data() -> impl Strategy<Value = (u64, Vec<u8>)> {
    proptest::collection::vec(any::<u8>(), 1..=256)
        .prop_flat_map(|data| (0..=RAM_SIZE - data.len() as u64, Just(data)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn read_after_write_returns_written_bytes(
        (offset, data) in offset_and_data(),
        selector in prop_oneof![Just(0u8), 1u8..=0xFF],
    ) {
        let map = AddressMapConfig { selector, ..AddressMapConfig::direct() };
        let (mut mon, _) = monitor(&config_for(map));
        // RAM is region 0 under every topology.
        let addr = offset;

        let ack = mon.service(&write(addr, &data)).unwrap().unwrap();
        prop_assert_eq!(ack.opcode(), Opcode::RespWrite);
        prop_assert_eq!((ack.dstaddr, ack.srcaddr), (HOST, addr));
        prop_assert!(ack.data.is_empty());

        let response = mon.service(&read(addr, data.len())).unwrap().unwrap();
        prop_assert_eq!(response.opcode(), Opcode::RespRead);
        prop_assert_eq!((response.dstaddr, response.srcaddr), (HOST, addr));
        prop_assert_eq!(response.data, data);
    }

    #[test]
    fn repeated_reads_are_identical(
        image in proptest::collection::vec(any::<u8>(), 1..512),
        offset in 0u64..256,
        nbytes in 1usize..=256,
    ) {
        let (mut mon, _) = monitor(&config_for(AddressMapConfig::direct()));
        mon.initialize_memory(0, &image).unwrap();

        let first = mon.service(&read(offset, nbytes)).unwrap().unwrap();
        let second = mon.service(&read(offset, nbytes)).unwrap().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn posted_and_acknowledged_writes_have_identical_effect(
        (offset, data) in offset_and_data(),
    ) {
        let config = config_for(AddressMapConfig::direct());
        let (mut acked, _) = monitor(&config);
        let (mut fire_and_forget, _) = monitor(&config);

        prop_assert!(acked.service(&write(offset, &data)).unwrap().is_some());
        prop_assert!(fire_and_forget.service(&posted(offset, &data)).unwrap().is_none());
        prop_assert_eq!(
            acked.read_memory(0, RAM_SIZE as usize).unwrap(),
            fire_and_forget.read_memory(0, RAM_SIZE as usize).unwrap()
        );
    }

    #[test]
    fn initialized_image_reads_back_unchanged(
        image in proptest::collection::vec(any::<u8>(), 1..=256),
    ) {
        let (mut mon, _) = monitor(&config_for(AddressMapConfig::direct()));
        mon.initialize_memory(0, &image).unwrap();
        let response = mon.service(&read(0, image.len())).unwrap().unwrap();
        prop_assert_eq!(response.data, image);
    }
}
