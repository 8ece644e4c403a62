use mockall::mock;
use umi_monitor_core::MonitorResult;
use umi_monitor_core::soc::devices::Device;

mock! {
    pub Region {}
    impl Device for Region {
        fn name(&self) -> &'static str;
        fn address_range(&self) -> (u64, u64);
        fn read(&mut self, offset: u64, len: usize) -> MonitorResult<Vec<u8>>;
        fn write(&mut self, offset: u64, data: &[u8]) -> MonitorResult<()>;
        fn flush(&mut self) -> MonitorResult<()>;
    }
}

/// Builds a mock occupying `[base, base + size)` under `name`.
pub fn region(name: &'static str, base: u64, size: u64) -> MockRegion {
    let mut mock = MockRegion::new();
    let _ = mock.expect_name().return_const(name);
    let _ = mock.expect_address_range().return_const((base, size));
    mock
}
