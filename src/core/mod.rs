//! Core waiting-list abstractions and capacity accounting.

pub mod audit;
pub mod availability;
pub mod collaborators;
pub mod entry;
pub mod error;
pub mod expiration;
pub mod store;
pub mod waiting_list;

pub use audit::{
    build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, TracingAuditSink,
};
pub use availability::Availability;
pub use collaborators::{
    Allocation, AllocationLedger, AllocationStatus, Resource, ResourceProvider,
};
pub use entry::{EntryStatus, JoinOutcome, QueueEntry, QueuePosition};
pub use error::{AppResult, WaitingListError};
pub use expiration::{ExpirationTimers, ExpiryJob, Spawn};
pub use store::WaitingListStore;
pub use waiting_list::WaitingList;
