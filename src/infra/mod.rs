//! Infrastructure adapters for the entry store and external collaborators.

pub mod catalog;
pub mod store;

pub use catalog::{InMemoryCatalog, InMemoryLedger};
pub use store::InMemoryWaitingList;
