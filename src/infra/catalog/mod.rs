//! Resource catalog and allocation ledger backends.

pub mod memory;

pub use memory::{InMemoryCatalog, InMemoryLedger};
