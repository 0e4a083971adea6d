//! SQLite implementation of CollectionRepository (C14, spec.md §4.8).

use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

use crate::domain::entities::{CollectionInfo, CustomCollection};
use crate::domain::repositories::CollectionRepository;
use crate::domain::value_objects::MemberStatus;
use crate::shared::error::RepositoryError;

pub struct SqliteCollectionRepository {
    pool: Pool<Sqlite>,
}

impl SqliteCollectionRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

fn parse_status(s: &str) -> MemberStatus {
    match s {
        "in_library" => MemberStatus::InLibrary,
        "subscribed" => MemberStatus::Subscribed,
        "unreleased" => MemberStatus::Unreleased,
        _ => MemberStatus::Missing,
    }
}

fn row_to_collection(row: &sqlx::sqlite::SqliteRow) -> Result<CustomCollection, RepositoryError> {
    let definition_json: String = row.get("definition_json");
    Ok(CustomCollection {
        collection_id: row.get("collection_id"),
        name: row.get("name"),
        definition: serde_json::from_str(&definition_json)?,
        emby_collection_id: row.get("emby_collection_id"),
        last_refreshed_at: row.get("last_refreshed_at"),
    })
}

fn row_to_info(row: &sqlx::sqlite::SqliteRow) -> CollectionInfo {
    CollectionInfo {
        collection_id: row.get("collection_id"),
        tmdb_id: row.get("tmdb_id"),
        title: row.get("title"),
        status: parse_status(&row.get::<String, _>("status")),
        subscribed: row.get::<i64, _>("subscribed") != 0,
    }
}

#[async_trait]
impl CollectionRepository for SqliteCollectionRepository {
    async fn save(&self, collection: &CustomCollection) -> Result<i64, RepositoryError> {
        let definition_json = serde_json::to_string(&collection.definition)?;
        if collection.collection_id > 0 {
            sqlx::query(
                "UPDATE custom_collection SET name = ?, definition_json = ?, emby_collection_id = ?, last_refreshed_at = ?
                 WHERE collection_id = ?",
            )
            .bind(&collection.name)
            .bind(&definition_json)
            .bind(&collection.emby_collection_id)
            .bind(collection.last_refreshed_at)
            .bind(collection.collection_id)
            .execute(&self.pool)
            .await?;
            return Ok(collection.collection_id);
        }

        let row = sqlx::query(
            "INSERT INTO custom_collection (name, definition_json, emby_collection_id, last_refreshed_at)
             VALUES (?, ?, ?, ?) RETURNING collection_id",
        )
        .bind(&collection.name)
        .bind(&definition_json)
        .bind(&collection.emby_collection_id)
        .bind(collection.last_refreshed_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("collection_id"))
    }

    async fn find_by_id(&self, collection_id: i64) -> Result<Option<CustomCollection>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM custom_collection WHERE collection_id = ?")
            .bind(collection_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_collection).transpose()
    }

    async fn find_all(&self) -> Result<Vec<CustomCollection>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM custom_collection").fetch_all(&self.pool).await?;
        rows.iter().map(row_to_collection).collect()
    }

    async fn delete(&self, collection_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM custom_collection WHERE collection_id = ?")
            .bind(collection_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn replace_members(&self, collection_id: i64, members: Vec<CollectionInfo>) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM collection_info WHERE collection_id = ?")
            .bind(collection_id)
            .execute(&mut *tx)
            .await?;
        for member in members {
            sqlx::query(
                "INSERT INTO collection_info (collection_id, tmdb_id, title, status, subscribed)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(collection_id)
            .bind(&member.tmdb_id)
            .bind(&member.title)
            .bind(member.status.to_string())
            .bind(member.subscribed as i64)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn find_members(&self, collection_id: i64) -> Result<Vec<CollectionInfo>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM collection_info WHERE collection_id = ?")
            .bind(collection_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_info).collect())
    }

    async fn find_missing_members(&self, collection_id: i64) -> Result<Vec<CollectionInfo>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM collection_info WHERE collection_id = ? AND status = 'missing'")
            .bind(collection_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(row_to_info).collect())
    }
}
