//! Events raised by the task manager (C12, spec.md §4.6).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::TaskKey;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskCompletedEvent {
    pub task_key: TaskKey,
    pub succeeded: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl TaskCompletedEvent {
    pub fn new(task_key: TaskKey, succeeded: bool, message: String) -> Self {
        Self { task_key, succeeded, message, timestamp: Utc::now() }
    }
}

impl crate::interfaces::messaging::DomainEvent for TaskCompletedEvent {
    fn event_type(&self) -> &'static str {
        "task_completed"
    }
}
