//! TranslationRepository trait (C2) — translation cache (spec.md §4.2).

use async_trait::async_trait;

use crate::domain::entities::TranslationEntry;
use crate::shared::error::RepositoryError;

#[async_trait]
pub trait TranslationRepository: Send + Sync {
    async fn find(&self, source_text: &str) -> Result<Option<TranslationEntry>, RepositoryError>;

    async fn find_many(&self, source_texts: &[String]) -> Result<Vec<TranslationEntry>, RepositoryError>;

    /// Writes `entry`, honoring engine-priority precedence against any
    /// existing row for the same `source_text` (spec.md §4.2: manual=2,
    /// AI=1, others=0; higher wins, ties keep the local entry).
    async fn upsert(&self, entry: TranslationEntry) -> Result<(), RepositoryError>;
}
