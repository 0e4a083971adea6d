//! IdentityRepository trait (C1) — the person identity map (spec.md §4.1).

use async_trait::async_trait;

use crate::domain::entities::{PersonIdentity, UpsertCandidate};
use crate::shared::error::RepositoryError;

/// Repository for the reconciled person identity map.
///
/// `upsert` implements the full merge algorithm of spec.md §4.1: ID-based
/// merge of any rows that already carry one of the candidate's external
/// IDs (smallest `map_id` survives), falling back to a name-based soft
/// merge against a row that has no conflicting external ID.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    async fn upsert(&self, candidate: UpsertCandidate) -> Result<PersonIdentity, RepositoryError>;

    async fn find_by_id(&self, map_id: i64) -> Result<Option<PersonIdentity>, RepositoryError>;

    async fn find_by_tmdb_id(&self, tmdb_person_id: &str) -> Result<Option<PersonIdentity>, RepositoryError>;

    async fn find_by_douban_id(&self, douban_celebrity_id: &str) -> Result<Option<PersonIdentity>, RepositoryError>;

    async fn find_by_imdb_id(&self, imdb_id: &str) -> Result<Option<PersonIdentity>, RepositoryError>;

    /// Sets the IMDb ID on a row, used by the identity enricher (C11).
    async fn set_imdb_id(&self, map_id: i64, imdb_id: &str) -> Result<(), RepositoryError>;

    /// Bumps `last_synced_at` without changing any ID, recording that a
    /// sync attempt happened even though it produced nothing usable
    /// (transient upstream failure, spec.md §8 S6).
    async fn touch_last_synced(&self, map_id: i64) -> Result<(), RepositoryError>;

    async fn delete(&self, map_id: i64) -> Result<(), RepositoryError>;

    /// Rows lacking an IMDb ID but carrying a TMDb person ID, batched for
    /// the enricher's Phase A (spec.md §4.5).
    async fn find_missing_imdb_with_tmdb_id(&self, limit: usize, offset: usize) -> Result<Vec<PersonIdentity>, RepositoryError>;

    /// Rows lacking an IMDb ID but carrying a Douban celebrity ID, for
    /// Phase B.
    async fn find_missing_imdb_with_douban_id(&self, limit: usize, offset: usize) -> Result<Vec<PersonIdentity>, RepositoryError>;

    async fn count(&self) -> Result<i64, RepositoryError>;
}
