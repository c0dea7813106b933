//! REST adapter for a remote task store.
//!
//! The remote exposes the task collection at a single endpoint:
//! `GET` lists, `POST` creates, and `PUT`/`DELETE` on `{endpoint}/{id}`
//! update and delete. Records travel as camelCase JSON.

mod config;
mod store;

pub use config::HttpStoreConfig;
pub use store::{HttpTaskStore, UnexpectedStatus};
