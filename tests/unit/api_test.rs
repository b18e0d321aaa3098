//! Tests for API request/response models

use prometheus_waiting_list::builders::build_waiting_list;
use prometheus_waiting_list::config::WaitingListConfig;
use prometheus_waiting_list::core::{EntryStatus, Resource, WaitingList};
use prometheus_waiting_list::infra::{InMemoryCatalog, InMemoryLedger, InMemoryWaitingList};
use prometheus_waiting_list::runtime::{
    health, join_waiting_list, queue_position, release_offer, resource_availability, JoinRequest,
    ReleaseRequest, TokioSpawner,
};

type List = WaitingList<InMemoryWaitingList, InMemoryCatalog, InMemoryLedger, TokioSpawner>;

fn list(total_units: u32) -> List {
    let catalog = InMemoryCatalog::new();
    catalog.upsert(Resource::new("event-1", total_units));
    build_waiting_list(
        &WaitingListConfig::default(),
        InMemoryWaitingList::new(),
        catalog,
        InMemoryLedger::new(),
        TokioSpawner::current(),
    )
    .unwrap()
}

fn join_req(requester: &str) -> JoinRequest {
    JoinRequest {
        resource_id: "event-1".to_string(),
        requester_id: requester.to_string(),
    }
}

#[tokio::test]
async fn test_join_response_messages() {
    let list = list(1);

    let offered = join_waiting_list(&list, &join_req("alice")).await.unwrap();
    assert!(offered.success);
    assert_eq!(offered.status, EntryStatus::Offered);
    assert_eq!(
        offered.message,
        "Ticket offered - you have 30 minutes to purchase"
    );
    assert!(offered.offer_expires_at_ms.is_some());

    let waiting = join_waiting_list(&list, &join_req("bob")).await.unwrap();
    assert_eq!(waiting.status, EntryStatus::Waiting);
    assert_eq!(
        waiting.message,
        "Added to waiting list - you'll be notified when a ticket becomes available."
    );
    assert_eq!(waiting.offer_expires_at_ms, None);
}

#[tokio::test]
async fn test_error_response_for_duplicate_join() {
    let list = list(1);
    join_waiting_list(&list, &join_req("alice")).await.unwrap();

    let err = join_waiting_list(&list, &join_req("alice")).await.unwrap_err();
    assert_eq!(err.kind, "already_queued");
    assert!(!err.retryable);
    assert!(err.message.contains("alice"));
}

#[tokio::test]
async fn test_position_and_availability_responses() {
    let list = list(1);
    let alice = join_waiting_list(&list, &join_req("alice")).await.unwrap();
    join_waiting_list(&list, &join_req("bob")).await.unwrap();

    let pos = queue_position(&list, "event-1", "bob").unwrap().unwrap();
    assert_eq!(pos.position, 2);
    assert_eq!(pos.waiting_position, 1);
    assert!(queue_position(&list, "event-1", "carol").unwrap().is_none());

    let availability = resource_availability(&list, "event-1").await.unwrap();
    assert!(!availability.available);
    assert_eq!(availability.available_spots, 0);
    assert_eq!(availability.active_offers, 1);
    assert_eq!(availability.purchased_count, 0);

    release_offer(
        &list,
        &ReleaseRequest {
            resource_id: "event-1".to_string(),
            entry_id: alice.entry_id,
        },
    )
    .await
    .unwrap();
    let pos = queue_position(&list, "event-1", "bob").unwrap().unwrap();
    assert_eq!(pos.entry.status, EntryStatus::Offered);
    assert_eq!(pos.position, 1);
}

#[tokio::test]
async fn test_health_reports_pending_timers() {
    let list = list(2);
    assert!(health(&list).ok);
    join_waiting_list(&list, &join_req("alice")).await.unwrap();
    assert_eq!(health(&list).pending_timers, 1);

    let json = serde_json::to_value(health(&list)).unwrap();
    assert_eq!(json["ok"], true);
}

#[tokio::test]
async fn test_unknown_resource_error_response() {
    let list = list(1);
    let err = resource_availability(&list, "missing").await.unwrap_err();
    assert_eq!(err.kind, "not_found");
}
