//! Tests for builder modules

use std::sync::Arc;

use prometheus_waiting_list::builders::{build_waiting_list, WaitingListBuilder};
use prometheus_waiting_list::config::WaitingListConfig;
use prometheus_waiting_list::core::{AuditAction, InMemoryAuditSink, Resource, WaitingListError};
use prometheus_waiting_list::infra::{InMemoryCatalog, InMemoryLedger, InMemoryWaitingList};
use prometheus_waiting_list::runtime::TokioSpawner;
use prometheus_waiting_list::util::ManualClock;

fn catalog() -> InMemoryCatalog {
    let catalog = InMemoryCatalog::new();
    catalog.upsert(Resource::new("event-1", 1));
    catalog
}

#[tokio::test]
async fn test_build_waiting_list_defaults() {
    let list = build_waiting_list(
        &WaitingListConfig::default(),
        InMemoryWaitingList::new(),
        catalog(),
        InMemoryLedger::new(),
        TokioSpawner::current(),
    )
    .unwrap();

    assert_eq!(list.config().offer_ttl_secs, 1800);
    assert!(list.join("event-1", "alice").await.unwrap().granted);
}

#[tokio::test]
async fn test_build_rejects_invalid_config() {
    let result = build_waiting_list(
        &WaitingListConfig::default().with_offer_ttl_secs(0),
        InMemoryWaitingList::new(),
        catalog(),
        InMemoryLedger::new(),
        TokioSpawner::current(),
    );

    match result {
        Err(WaitingListError::Backend(msg)) => assert!(msg.starts_with("config invalid")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("invalid config accepted"),
    }
}

#[tokio::test]
async fn test_builder_with_clock_and_audit() {
    let audit = InMemoryAuditSink::new(16);
    let list = WaitingListBuilder::new(WaitingListConfig::default().with_offer_ttl_secs(60))
        .clock(Arc::new(ManualClock::new(10_000)))
        .audit(Box::new(audit.clone()))
        .build(
            InMemoryWaitingList::new(),
            catalog(),
            InMemoryLedger::new(),
            TokioSpawner::current(),
        )
        .unwrap();

    let outcome = list.join("event-1", "alice").await.unwrap();
    assert_eq!(outcome.entry.created_at_ms, 10_000);
    assert_eq!(outcome.entry.offer_expires_at_ms, Some(70_000));
    assert_eq!(audit.actions_for(outcome.entry.id), vec![AuditAction::Offered]);
}
