//! SQLite implementation of LogRepository (C3).
//!
//! `item_id` appears in at most one of `processed_log` / `failed_log`;
//! recording into one table clears any stale row from the other.

use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

use crate::domain::entities::{FailedLogEntry, ProcessedLogEntry};
use crate::domain::repositories::LogRepository;
use crate::shared::error::RepositoryError;

pub struct SqliteLogRepository {
    pool: Pool<Sqlite>,
}

impl SqliteLogRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogRepository for SqliteLogRepository {
    async fn record_processed(&self, entry: ProcessedLogEntry) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM failed_log WHERE item_id = ?").bind(&entry.item_id).execute(&mut *tx).await?;
        sqlx::query(
            "INSERT INTO processed_log (item_id, item_name, quality_score, processed_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(item_id) DO UPDATE SET
                item_name = excluded.item_name,
                quality_score = excluded.quality_score,
                processed_at = excluded.processed_at",
        )
        .bind(&entry.item_id)
        .bind(&entry.item_name)
        .bind(entry.quality_score)
        .bind(entry.processed_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn record_failed(&self, entry: FailedLogEntry) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM processed_log WHERE item_id = ?").bind(&entry.item_id).execute(&mut *tx).await?;
        sqlx::query(
            "INSERT INTO failed_log (item_id, item_name, reason, failed_at)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(item_id) DO UPDATE SET
                item_name = excluded.item_name,
                reason = excluded.reason,
                failed_at = excluded.failed_at",
        )
        .bind(&entry.item_id)
        .bind(&entry.item_name)
        .bind(&entry.reason)
        .bind(entry.failed_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn find_needing_review(&self, limit: usize) -> Result<Vec<ProcessedLogEntry>, RepositoryError> {
        // min_score_for_review is applied by the caller, which knows the
        // configured threshold; this returns the lowest-scoring recent rows.
        let rows = sqlx::query(
            "SELECT item_id, item_name, quality_score, processed_at FROM processed_log
             ORDER BY quality_score ASC, processed_at DESC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| ProcessedLogEntry {
                item_id: row.get("item_id"),
                item_name: row.get("item_name"),
                quality_score: row.get("quality_score"),
                processed_at: row.get("processed_at"),
            })
            .collect())
    }

    async fn find_recent_failures(&self, limit: usize) -> Result<Vec<FailedLogEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT item_id, item_name, reason, failed_at FROM failed_log ORDER BY failed_at DESC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| FailedLogEntry {
                item_id: row.get("item_id"),
                item_name: row.get("item_name"),
                reason: row.get("reason"),
                failed_at: row.get("failed_at"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup() -> SqliteLogRepository {
        let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
        crate::infrastructure::database::initialize_schema(&pool).await.unwrap();
        SqliteLogRepository::new(pool)
    }

    #[tokio::test]
    async fn an_item_moves_from_failed_to_processed() {
        let repo = setup().await;
        repo.record_failed(FailedLogEntry {
            item_id: "1".into(),
            item_name: "Show".into(),
            reason: "no cast".into(),
            failed_at: Utc::now(),
        })
        .await
        .unwrap();
        repo.record_processed(ProcessedLogEntry {
            item_id: "1".into(),
            item_name: "Show".into(),
            quality_score: 8.0,
            processed_at: Utc::now(),
        })
        .await
        .unwrap();

        assert!(repo.find_recent_failures(10).await.unwrap().is_empty());
        assert_eq!(repo.find_needing_review(10).await.unwrap().len(), 1);
    }
}
