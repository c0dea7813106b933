//! In-memory adapters for tests and local sessions.

mod store;

pub use store::InMemoryTaskStore;
