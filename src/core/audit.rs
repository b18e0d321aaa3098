//! Audit trail of waiting-list transitions.
//!
//! Provides a bounded in-memory sink for tests and dev, and a sink that emits
//! each event through `tracing` under the `waiting_list::audit` target.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::QueueEntry;
use crate::util::clock::now_ms;
use crate::util::serde::{EntryId, RequesterId, ResourceId};

/// Transition recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Joined and received an offer immediately.
    Offered,
    /// Joined and was queued.
    Waiting,
    /// Waiting entry received an offer.
    Promoted,
    /// Offer lapsed.
    Expired,
    /// Holder gave the offer back.
    Released,
    /// Offer converted into an allocation.
    Fulfilled,
}

impl AuditAction {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Offered => "offered",
            Self::Waiting => "waiting",
            Self::Promoted => "promoted",
            Self::Expired => "expired",
            Self::Released => "released",
            Self::Fulfilled => "fulfilled",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: Uuid,
    /// Entry that transitioned.
    pub entry_id: EntryId,
    /// Resource of the entry.
    pub resource_id: ResourceId,
    /// Requester of the entry.
    pub requester_id: RequesterId,
    /// Transition taken.
    pub action: AuditAction,
    /// Wall-clock timestamp in milliseconds.
    pub created_at_ms: u128,
    /// Additional context (allocation id, sweep marker).
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// Bounded in-memory audit sink.
///
/// Clones share the same buffer, so a test can keep one handle while the
/// waiting list owns another.
#[derive(Clone)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<VecDeque<AuditEvent>>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a sink keeping at most `max_events`, dropping the oldest first.
    /// With `max_events == 0` nothing is kept.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events.min(1024)))),
            max_events,
        }
    }

    /// Snapshot of stored events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }

    /// Actions recorded for one entry, oldest first.
    #[must_use]
    pub fn actions_for(&self, entry_id: EntryId) -> Vec<AuditAction> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.entry_id == entry_id)
            .map(|e| e.action)
            .collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Sink that logs every event at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, event: AuditEvent) {
        tracing::info!(
            target: "waiting_list::audit",
            event_id = %event.event_id,
            entry_id = event.entry_id,
            resource_id = %event.resource_id,
            requester_id = %event.requester_id,
            action = event.action.as_str(),
            detail = event.detail.as_deref().unwrap_or(""),
            "audit"
        );
    }
}

/// Build an audit event for an entry's transition.
#[must_use]
pub fn build_audit_event(
    entry: &QueueEntry,
    action: AuditAction,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: Uuid::new_v4(),
        entry_id: entry.id,
        resource_id: entry.resource_id.clone(),
        requester_id: entry.requester_id.clone(),
        action,
        created_at_ms: now_ms(),
        detail,
    }
}
