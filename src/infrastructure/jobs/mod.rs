//! Task Management Module (C12)
//!
//! Single-slot task queue with cooperative cancellation for long-running
//! background operations (full scans, metadata population, collection
//! refreshes).

mod task_manager;

pub use task_manager::{TaskHandle, TaskManager, TaskStatus};
