//! SQLite implementation of TranslationRepository (C2).

use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

use crate::domain::entities::TranslationEntry;
use crate::domain::repositories::TranslationRepository;
use crate::shared::error::RepositoryError;

pub struct SqliteTranslationRepository {
    pool: Pool<Sqlite>,
}

impl SqliteTranslationRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> TranslationEntry {
    TranslationEntry {
        source_text: row.get("source_text"),
        translated_text: row.get("translated_text"),
        engine_used: row.get("engine_used"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl TranslationRepository for SqliteTranslationRepository {
    async fn find(&self, source_text: &str) -> Result<Option<TranslationEntry>, RepositoryError> {
        let row = sqlx::query(
            "SELECT source_text, translated_text, engine_used, updated_at FROM translation_cache WHERE source_text = ?",
        )
        .bind(source_text)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(row_to_entry))
    }

    async fn find_many(&self, source_texts: &[String]) -> Result<Vec<TranslationEntry>, RepositoryError> {
        if source_texts.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = std::iter::repeat("?").take(source_texts.len()).collect::<Vec<_>>().join(",");
        let sql = format!(
            "SELECT source_text, translated_text, engine_used, updated_at FROM translation_cache WHERE source_text IN ({placeholders})"
        );
        let mut query = sqlx::query(&sql);
        for text in source_texts {
            query = query.bind(text);
        }
        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows.iter().map(row_to_entry).collect())
    }

    async fn upsert(&self, entry: TranslationEntry) -> Result<(), RepositoryError> {
        let existing = self.find(&entry.source_text).await?;
        if let Some(existing) = existing {
            if !existing.should_be_replaced_by(&entry.engine_used) {
                return Ok(());
            }
        }

        sqlx::query(
            "INSERT INTO translation_cache (source_text, translated_text, engine_used, updated_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(source_text) DO UPDATE SET
                translated_text = excluded.translated_text,
                engine_used = excluded.engine_used,
                updated_at = excluded.updated_at",
        )
        .bind(&entry.source_text)
        .bind(&entry.translated_text)
        .bind(&entry.engine_used)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
