//! Kanban board state and its optimistic synchronization with a task store.
//!
//! The board is a columnar, in-memory view over a flat collection of task
//! records. Dragging a card is resolved into a new board value locally and
//! then confirmed against the store asynchronously. The module follows
//! hexagonal architecture:
//!
//! - Domain types, projection, and move resolution in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
