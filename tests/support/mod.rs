//! Shared harness for waiting-list integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use prometheus_waiting_list::builders::WaitingListBuilder;
use prometheus_waiting_list::config::WaitingListConfig;
use prometheus_waiting_list::core::{
    EntryStatus, InMemoryAuditSink, QueueEntry, Resource, WaitingList,
};
use prometheus_waiting_list::infra::{InMemoryCatalog, InMemoryLedger, InMemoryWaitingList};
use prometheus_waiting_list::runtime::TokioSpawner;
use prometheus_waiting_list::util::clock::Clock;

/// The default offer lifetime.
pub const TTL: Duration = Duration::from_secs(30 * 60);

pub type List = WaitingList<InMemoryWaitingList, InMemoryCatalog, InMemoryLedger, TokioSpawner>;

pub struct Harness {
    pub list: List,
    pub catalog: InMemoryCatalog,
    pub ledger: InMemoryLedger,
    pub audit: InMemoryAuditSink,
}

/// Waiting list over one resource `event-1`, on the current runtime.
pub fn harness(total_units: u32) -> Harness {
    harness_with(total_units, WaitingListConfig::default(), None)
}

pub fn harness_with(
    total_units: u32,
    config: WaitingListConfig,
    clock: Option<Arc<dyn Clock>>,
) -> Harness {
    let catalog = InMemoryCatalog::new();
    catalog.upsert(Resource::new("event-1", total_units));
    let ledger = InMemoryLedger::new();
    let audit = InMemoryAuditSink::new(1_000);

    let mut builder = WaitingListBuilder::new(config).audit(Box::new(audit.clone()));
    if let Some(clock) = clock {
        builder = builder.clock(clock);
    }
    let list = builder
        .build(
            InMemoryWaitingList::new(),
            catalog.clone(),
            ledger.clone(),
            TokioSpawner::current(),
        )
        .expect("valid config");

    Harness {
        list,
        catalog,
        ledger,
        audit,
    }
}

/// Let spawned timer tasks run to completion.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

pub fn status(list: &List, entry: &QueueEntry) -> EntryStatus {
    list.entry(entry.id)
        .expect("store read")
        .expect("entry exists")
        .status
}

/// Count entries of `event-1` in a given status.
pub fn count(list: &List, wanted: EntryStatus) -> usize {
    list.entries("event-1")
        .expect("store read")
        .iter()
        .filter(|e| e.status == wanted)
        .count()
}
