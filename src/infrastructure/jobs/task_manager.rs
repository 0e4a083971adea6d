//! Task Manager (C12) — single-slot task queue with cooperative cancellation.
//!
//! At most one task runs at a time; `submit` returns `false` when a task is
//! already running instead of queuing the request. Progress is reported as
//! an integer in `-1..=100`, where `-1` denotes failure, alongside a bounded
//! ring of recent log lines for observers to poll.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::domain::value_objects::TaskKey;

const MAX_LOG_LINES: usize = 200;

#[derive(Debug, Clone)]
pub struct TaskStatus {
    pub key: TaskKey,
    pub progress: i32,
    pub message: String,
    pub recent_log_lines: VecDeque<String>,
    pub running: bool,
}

impl TaskStatus {
    fn starting(key: TaskKey) -> Self {
        Self {
            key,
            progress: 0,
            message: format!("starting {}", key.display_name()),
            recent_log_lines: VecDeque::new(),
            running: true,
        }
    }
}

/// Handed to a running task body so it can report progress and observe
/// cancellation without reaching back into the manager.
#[derive(Clone)]
pub struct TaskHandle {
    cancellation: CancellationToken,
    status: Arc<RwLock<TaskStatus>>,
}

impl TaskHandle {
    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub async fn set_progress(&self, progress: i32, message: impl Into<String>) {
        let mut status = self.status.write().await;
        status.progress = progress.clamp(-1, 100);
        status.message = message.into();
    }

    pub async fn log(&self, line: impl Into<String>) {
        let mut status = self.status.write().await;
        status.recent_log_lines.push_back(line.into());
        if status.recent_log_lines.len() > MAX_LOG_LINES {
            status.recent_log_lines.pop_front();
        }
    }
}

pub struct TaskManager {
    current: Arc<RwLock<Option<(TaskKey, Arc<RwLock<TaskStatus>>)>>>,
    cancellation: Arc<RwLock<Option<CancellationToken>>>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self { current: Arc::new(RwLock::new(None)), cancellation: Arc::new(RwLock::new(None)) }
    }

    /// Submits `job` under `key`. Returns `false` without starting anything
    /// if a task is currently running.
    pub async fn submit<F, Fut>(&self, key: TaskKey, job: F) -> bool
    where
        F: FnOnce(TaskHandle) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        let mut current = self.current.write().await;
        if let Some((_, status)) = current.as_ref() {
            if status.read().await.running {
                return false;
            }
        }

        let status = Arc::new(RwLock::new(TaskStatus::starting(key)));
        let cancellation = CancellationToken::new();
        *current = Some((key, status.clone()));
        *self.cancellation.write().await = Some(cancellation.clone());
        drop(current);

        let handle = TaskHandle { cancellation, status: status.clone() };
        tokio::spawn(async move {
            let result = job(handle).await;
            let mut status = status.write().await;
            match result {
                Ok(()) => {
                    status.progress = 100;
                    status.message = "completed".to_string();
                }
                Err(error) => {
                    status.progress = -1;
                    status.message = error;
                }
            }
            status.running = false;
        });

        true
    }

    pub async fn status(&self) -> Option<TaskStatus> {
        let current = self.current.read().await;
        match current.as_ref() {
            Some((_, status)) => Some(status.read().await.clone()),
            None => None,
        }
    }

    /// Requests cancellation of the currently running task, if any. The task
    /// body must poll `TaskHandle::is_cancelled` at its own loop boundaries.
    pub async fn cancel(&self) -> bool {
        match self.cancellation.read().await.as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub async fn is_busy(&self) -> bool {
        match self.current.read().await.as_ref() {
            Some((_, status)) => status.read().await.running,
            None => false,
        }
    }
}

impl Default for TaskManager {
    fn default() -> Self {
        Self::new()
    }
}
