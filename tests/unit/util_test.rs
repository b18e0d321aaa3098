//! Tests for utility functions

use std::time::Duration;

use prometheus_waiting_list::util::{init_tracing, now_ms, Clock, EntryId, ManualClock};

#[test]
fn test_now_ms_is_wall_clock() {
    // 2020-01-01T00:00:00Z
    assert!(now_ms() > 1_577_836_800_000);
}

#[test]
fn test_manual_clock() {
    let clock = ManualClock::new(5_000);
    assert_eq!(clock.now_ms(), 5_000);
    clock.advance(Duration::from_millis(250));
    assert_eq!(clock.now_ms(), 5_250);
}

#[test]
fn test_entry_id() {
    let id: EntryId = 12345;
    assert_eq!(id, 12345);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!("tracing initialised");
}
