//! Builders assembling a waiting list from configuration.

pub mod waiting_list_builder;

pub use waiting_list_builder::{build_waiting_list, WaitingListBuilder};
