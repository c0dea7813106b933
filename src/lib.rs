//! Ozikanban: a Kanban board kept in step with a remote task store.
//!
//! A board groups tasks into ordered workflow columns. Moves are applied
//! locally at once and persisted in the background, with the remote store
//! remaining the source of truth on every reload.
//!
//! # Architecture
//!
//! Ozikanban follows hexagonal architecture principles:
//!
//! - **Domain**: Board projection and move resolution with no I/O
//! - **Ports**: The task store contract
//! - **Adapters**: REST and in-memory task stores
//!
//! # Modules
//!
//! - [`board`]: Board state, task stores, and synchronization
//! - [`session`]: The signed-in user gating board access

pub mod board;
pub mod session;
