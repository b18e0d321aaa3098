//! Configuration models for the waiting list.

pub mod waiting_list;

pub use waiting_list::{ResourceTypeConfig, WaitingListConfig};
