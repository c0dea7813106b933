//! Application services for board synchronization.

mod config;
mod retry;
mod sync;

pub use config::BoardSyncConfig;
pub use retry::RetryPolicy;
pub use sync::{
    BoardSyncError, BoardSyncResult, BoardSyncService, BoardVersion, CreateTaskRequest,
    EditTaskRequest,
};
