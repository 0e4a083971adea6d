//! MediaMetadataRepository trait — local snapshot backing the
//! filter-sourced custom-collection engine (spec.md §4.8).

use async_trait::async_trait;

use crate::domain::entities::MediaMetadata;
use crate::shared::error::RepositoryError;

#[async_trait]
pub trait MediaMetadataRepository: Send + Sync {
    async fn upsert(&self, metadata: MediaMetadata) -> Result<(), RepositoryError>;

    async fn find_by_tmdb_id(&self, tmdb_id: &str) -> Result<Option<MediaMetadata>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<MediaMetadata>, RepositoryError>;
}
