//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use encoder_link::hal::mock::{EventLog, HwEvent};

/// Install a test-writer subscriber; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Index of the first event matching `pred`, panicking if there is none
pub fn position_of(log: &EventLog, what: &str, pred: impl Fn(&HwEvent) -> bool) -> usize {
    log.position(pred)
        .unwrap_or_else(|| panic!("no {} event in {:?}", what, log.events()))
}

/// Assert an event matching `first` was logged before one matching `second`
pub fn assert_before(
    log: &EventLog,
    first_name: &str,
    first: impl Fn(&HwEvent) -> bool,
    second_name: &str,
    second: impl Fn(&HwEvent) -> bool,
) {
    let a = position_of(log, first_name, first);
    let b = position_of(log, second_name, second);
    assert!(
        a < b,
        "Expected {} (#{}) before {} (#{}) in {:?}",
        first_name,
        a,
        second_name,
        b,
        log.events()
    );
}
