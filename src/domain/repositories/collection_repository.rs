//! CollectionRepository trait (C14) — custom collections and their
//! resolved membership snapshots (spec.md §4.8).

use async_trait::async_trait;

use crate::domain::entities::{CollectionInfo, CustomCollection};
use crate::shared::error::RepositoryError;

#[async_trait]
pub trait CollectionRepository: Send + Sync {
    async fn save(&self, collection: &CustomCollection) -> Result<i64, RepositoryError>;

    async fn find_by_id(&self, collection_id: i64) -> Result<Option<CustomCollection>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<CustomCollection>, RepositoryError>;

    async fn delete(&self, collection_id: i64) -> Result<(), RepositoryError>;

    /// Replaces the persisted membership snapshot for a list-sourced
    /// collection in one call, so a partial write is never observed.
    async fn replace_members(&self, collection_id: i64, members: Vec<CollectionInfo>) -> Result<(), RepositoryError>;

    async fn find_members(&self, collection_id: i64) -> Result<Vec<CollectionInfo>, RepositoryError>;

    async fn find_missing_members(&self, collection_id: i64) -> Result<Vec<CollectionInfo>, RepositoryError>;
}
