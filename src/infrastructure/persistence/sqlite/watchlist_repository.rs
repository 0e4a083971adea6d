//! SQLite implementation of WatchlistRepository (spec.md §4.7).

use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

use crate::domain::entities::WatchlistEntry;
use crate::domain::repositories::WatchlistRepository;
use crate::domain::value_objects::ItemType;
use crate::shared::error::RepositoryError;

pub struct SqliteWatchlistRepository {
    pool: Pool<Sqlite>,
}

impl SqliteWatchlistRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

fn parse_item_type(s: &str) -> ItemType {
    match s {
        "Series" => ItemType::Series,
        "Episode" => ItemType::Episode,
        "Season" => ItemType::Season,
        _ => ItemType::Movie,
    }
}

fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> WatchlistEntry {
    WatchlistEntry {
        tmdb_id: row.get("tmdb_id"),
        item_type: parse_item_type(&row.get::<String, _>("item_type")),
        title: row.get("title"),
        added_at: row.get("added_at"),
        resolved: row.get::<i64, _>("resolved") != 0,
    }
}

#[async_trait]
impl WatchlistRepository for SqliteWatchlistRepository {
    async fn add(&self, entry: WatchlistEntry) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO watchlist (tmdb_id, item_type, title, added_at, resolved)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(tmdb_id) DO UPDATE SET
                item_type = excluded.item_type,
                title = excluded.title",
        )
        .bind(&entry.tmdb_id)
        .bind(entry.item_type.as_str())
        .bind(&entry.title)
        .bind(entry.added_at)
        .bind(entry.resolved as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_unresolved(&self) -> Result<Vec<WatchlistEntry>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM watchlist WHERE resolved = 0 ORDER BY added_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_entry).collect())
    }

    async fn mark_resolved(&self, tmdb_id: &str) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE watchlist SET resolved = 1 WHERE tmdb_id = ?")
            .bind(tmdb_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup() -> SqliteWatchlistRepository {
        let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
        crate::infrastructure::database::initialize_schema(&pool).await.unwrap();
        SqliteWatchlistRepository::new(pool)
    }

    #[tokio::test]
    async fn unresolved_entries_are_listed_until_marked_resolved() {
        let repo = setup().await;
        repo.add(WatchlistEntry {
            tmdb_id: "999".into(),
            item_type: ItemType::Movie,
            title: "Upcoming".into(),
            added_at: Utc::now(),
            resolved: false,
        })
        .await
        .unwrap();

        assert_eq!(repo.find_unresolved().await.unwrap().len(), 1);
        repo.mark_resolved("999").await.unwrap();
        assert!(repo.find_unresolved().await.unwrap().is_empty());
    }
}
