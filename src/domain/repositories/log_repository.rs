//! LogRepository trait (C3) — processed/failed item audit trail.

use async_trait::async_trait;

use crate::domain::entities::{FailedLogEntry, ProcessedLogEntry};
use crate::shared::error::RepositoryError;

#[async_trait]
pub trait LogRepository: Send + Sync {
    async fn record_processed(&self, entry: ProcessedLogEntry) -> Result<(), RepositoryError>;

    async fn record_failed(&self, entry: FailedLogEntry) -> Result<(), RepositoryError>;

    /// Processed items below `min_score_for_review`, most recent first.
    async fn find_needing_review(&self, limit: usize) -> Result<Vec<ProcessedLogEntry>, RepositoryError>;

    async fn find_recent_failures(&self, limit: usize) -> Result<Vec<FailedLogEntry>, RepositoryError>;
}
