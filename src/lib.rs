//! # Prometheus Waiting List
//!
//! A fair, first-come-first-served waiting list for scarce, countable resources
//! such as the tickets of a sold-out event.
//!
//! Requesters join the list of a resource. While capacity remains they receive a
//! time-bounded exclusive **offer** of one unit right away; otherwise they wait in
//! line. Whenever an offer expires or is released, the oldest waiters are promoted
//! into offers, never more than the free capacity. Capacity freed outside the
//! list, such as a voided allocation or a larger resource, is handed to waiters
//! by an explicit `promote`, the next sweep, or the next join.
//!
//! ## Guarantees
//!
//! - **No oversell**: committed allocations plus live offers never exceed the
//!   resource's capacity. Every writer re-derives availability under a
//!   per-resource lock, and a final re-check refuses to commit if it would oversell.
//! - **FIFO fairness**: promotion order is creation time, ties broken by entry id.
//! - **One entry per requester**: a requester holds at most one non-expired entry
//!   per resource, and may join again once it expires.
//! - **Idempotent expiration**: offer timers re-check state, so a late or duplicate
//!   firing never promotes twice.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prometheus_waiting_list::builders::build_waiting_list;
//! use prometheus_waiting_list::config::WaitingListConfig;
//! use prometheus_waiting_list::core::Resource;
//! use prometheus_waiting_list::infra::{InMemoryCatalog, InMemoryLedger, InMemoryWaitingList};
//! use prometheus_waiting_list::runtime::TokioSpawner;
//!
//! let catalog = InMemoryCatalog::new();
//! catalog.upsert(Resource::new("event-1", 100));
//!
//! let list = build_waiting_list(
//!     &WaitingListConfig::from_env()?,
//!     InMemoryWaitingList::new(),
//!     catalog,
//!     InMemoryLedger::new(),
//!     TokioSpawner::current(),
//! )?;
//!
//! let outcome = list.join("event-1", "alice").await?;
//! if outcome.granted {
//!     // purchase, then:
//!     list.fulfill("event-1", outcome.entry.id).await?;
//! }
//! ```
//!
//! For complete scenarios, see `tests/expiration_test.rs` and
//! `tests/concurrency_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core waiting-list abstractions and capacity accounting.
pub mod core;
/// Configuration models for offer lifetimes, retries, and sweeping.
pub mod config;
/// Builders to construct a waiting list from configuration.
pub mod builders;
/// Infrastructure adapters for entry storage, resources, and allocations.
pub mod infra;
/// Runtime adapters and API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
