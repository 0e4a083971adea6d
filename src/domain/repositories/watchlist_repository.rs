//! WatchlistRepository trait — titles awaiting release (spec.md §4.7).

use async_trait::async_trait;

use crate::domain::entities::WatchlistEntry;
use crate::shared::error::RepositoryError;

#[async_trait]
pub trait WatchlistRepository: Send + Sync {
    async fn add(&self, entry: WatchlistEntry) -> Result<(), RepositoryError>;

    async fn find_unresolved(&self) -> Result<Vec<WatchlistEntry>, RepositoryError>;

    async fn mark_resolved(&self, tmdb_id: &str) -> Result<(), RepositoryError>;
}
