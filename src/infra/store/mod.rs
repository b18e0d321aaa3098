//! Waiting-list store backends.

pub mod memory;

pub use memory::InMemoryWaitingList;
