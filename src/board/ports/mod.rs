//! Port contracts for board synchronization.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod store;

pub use store::{TaskStore, TaskStoreError, TaskStoreResult};

#[cfg(test)]
pub use store::MockTaskStore;
