//! Tests for audit sink

use prometheus_waiting_list::core::{
    build_audit_event, AuditAction, AuditSink, InMemoryAuditSink, QueueEntry,
};

fn entry(id: u64) -> QueueEntry {
    QueueEntry::waiting(id, "event-1", format!("user-{id}"), 100)
}

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(&entry(1), AuditAction::Waiting, None);
    sink.record(event.clone());
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].event_id, event.event_id);
    assert_eq!(events[0].entry_id, 1);
    assert_eq!(events[0].action, AuditAction::Waiting);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event(&entry(1), AuditAction::Waiting, None));
    sink.record(build_audit_event(&entry(2), AuditAction::Waiting, None));
    sink.record(build_audit_event(&entry(3), AuditAction::Waiting, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].entry_id, 2); // First one popped
    assert_eq!(events[1].entry_id, 3);
}

#[test]
fn test_audit_sink_zero_capacity_keeps_nothing() {
    let mut sink = InMemoryAuditSink::new(0);

    sink.record(build_audit_event(&entry(1), AuditAction::Waiting, None));
    sink.record(build_audit_event(&entry(2), AuditAction::Offered, None));

    assert!(sink.events().is_empty());
    assert!(sink.actions_for(1).is_empty());
}

#[test]
fn test_audit_sink_clones_share_events() {
    let handle = InMemoryAuditSink::new(10);
    let mut owned: Box<dyn AuditSink> = Box::new(handle.clone());

    owned.record(build_audit_event(&entry(7), AuditAction::Promoted, None));
    owned.record(build_audit_event(&entry(7), AuditAction::Expired, None));
    owned.record(build_audit_event(&entry(8), AuditAction::Waiting, None));

    assert_eq!(
        handle.actions_for(7),
        vec![AuditAction::Promoted, AuditAction::Expired]
    );
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event(
        &entry(1),
        AuditAction::Fulfilled,
        Some("allocation".to_string()),
    );

    assert_eq!(event.entry_id, 1);
    assert_eq!(event.resource_id, "event-1");
    assert_eq!(event.requester_id, "user-1");
    assert_eq!(event.action.as_str(), "fulfilled");
    assert_eq!(event.detail, Some("allocation".to_string()));
    assert!(event.created_at_ms > 0);

    let other = build_audit_event(&entry(1), AuditAction::Fulfilled, None);
    assert_ne!(event.event_id, other.event_id);
}

#[test]
fn test_audit_action_serializes_snake_case() {
    let json = serde_json::to_string(&AuditAction::Promoted).unwrap();
    assert_eq!(json, "\"promoted\"");
    assert_eq!(AuditAction::Released.to_string(), "released");
}
