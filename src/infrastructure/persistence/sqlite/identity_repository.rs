//! SQLite implementation of IdentityRepository (C1) — upsert/merge
//! algorithm from spec.md §4.1.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite};

use crate::domain::entities::{PersonIdentity, UpsertCandidate};
use crate::domain::repositories::IdentityRepository;
use crate::shared::error::RepositoryError;

pub struct SqliteIdentityRepository {
    pool: Pool<Sqlite>,
}

impl SqliteIdentityRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

fn row_to_identity(row: &sqlx::sqlite::SqliteRow) -> PersonIdentity {
    PersonIdentity {
        map_id: row.get("map_id"),
        primary_name: row.get("primary_name"),
        tmdb_person_id: row.get("tmdb_person_id"),
        emby_person_id: row.get("emby_person_id"),
        imdb_id: row.get("imdb_id"),
        douban_celebrity_id: row.get("douban_celebrity_id"),
        last_synced_at: row.get("last_synced_at"),
        last_updated_at: row.get("last_updated_at"),
    }
}

const SELECT_COLUMNS: &str =
    "map_id, primary_name, tmdb_person_id, emby_person_id, imdb_id, douban_celebrity_id, last_synced_at, last_updated_at";

#[async_trait]
impl IdentityRepository for SqliteIdentityRepository {
    async fn upsert(&self, candidate: UpsertCandidate) -> Result<PersonIdentity, RepositoryError> {
        if candidate.is_empty() {
            return Err(RepositoryError::InvalidInput("upsert candidate has no name and no external id".into()));
        }

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let query = format!(
            "SELECT {SELECT_COLUMNS} FROM person_identity_map
             WHERE (?1 IS NOT NULL AND tmdb_person_id = ?1)
                OR (?2 IS NOT NULL AND emby_person_id = ?2)
                OR (?3 IS NOT NULL AND imdb_id = ?3)
                OR (?4 IS NOT NULL AND douban_celebrity_id = ?4)
             ORDER BY map_id ASC"
        );
        let hits: Vec<PersonIdentity> = sqlx::query(&query)
            .bind(&candidate.tmdb_person_id)
            .bind(&candidate.emby_person_id)
            .bind(&candidate.imdb_id)
            .bind(&candidate.douban_celebrity_id)
            .fetch_all(&mut *tx)
            .await?
            .iter()
            .map(row_to_identity)
            .collect();

        if !hits.is_empty() {
            let mut survivor = hits[0].clone();
            for other in &hits[1..] {
                survivor.tmdb_person_id = survivor.tmdb_person_id.or_else(|| other.tmdb_person_id.clone());
                survivor.emby_person_id = survivor.emby_person_id.or_else(|| other.emby_person_id.clone());
                survivor.imdb_id = survivor.imdb_id.or_else(|| other.imdb_id.clone());
                survivor.douban_celebrity_id =
                    survivor.douban_celebrity_id.or_else(|| other.douban_celebrity_id.clone());
            }
            survivor.tmdb_person_id = survivor.tmdb_person_id.or_else(|| candidate.tmdb_person_id.clone());
            survivor.emby_person_id = survivor.emby_person_id.or_else(|| candidate.emby_person_id.clone());
            survivor.imdb_id = survivor.imdb_id.or_else(|| candidate.imdb_id.clone());
            survivor.douban_celebrity_id =
                survivor.douban_celebrity_id.or_else(|| candidate.douban_celebrity_id.clone());
            if let Some(name) = &candidate.name {
                survivor.primary_name = Some(name.clone());
            }
            survivor.last_updated_at = now;

            for other in &hits[1..] {
                sqlx::query("DELETE FROM person_identity_map WHERE map_id = ?")
                    .bind(other.map_id)
                    .execute(&mut *tx)
                    .await?;
            }

            sqlx::query(
                "UPDATE person_identity_map
                 SET primary_name = ?, tmdb_person_id = ?, emby_person_id = ?, imdb_id = ?,
                     douban_celebrity_id = ?, last_updated_at = ?
                 WHERE map_id = ?",
            )
            .bind(&survivor.primary_name)
            .bind(&survivor.tmdb_person_id)
            .bind(&survivor.emby_person_id)
            .bind(&survivor.imdb_id)
            .bind(&survivor.douban_celebrity_id)
            .bind(survivor.last_updated_at)
            .bind(survivor.map_id)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            return Ok(survivor);
        }

        // Name-based soft merge: a row is fuseable unless candidate carries an
        // external ID that would conflict with a row that already has one
        // (same name, different person).
        if let Some(name) = &candidate.name {
            let id_clause = if candidate.has_any_id() {
                "AND tmdb_person_id IS NULL AND emby_person_id IS NULL AND imdb_id IS NULL AND douban_celebrity_id IS NULL"
            } else {
                ""
            };
            let fuseable = sqlx::query(&format!(
                "SELECT {SELECT_COLUMNS} FROM person_identity_map WHERE primary_name = ? {id_clause} LIMIT 1"
            ))
            .bind(name)
            .fetch_optional(&mut *tx)
            .await?;

            if let Some(row) = fuseable {
                let mut found = row_to_identity(&row);
                if candidate.has_any_id() {
                    found.tmdb_person_id = candidate.tmdb_person_id.clone();
                    found.emby_person_id = candidate.emby_person_id.clone();
                    found.imdb_id = candidate.imdb_id.clone();
                    found.douban_celebrity_id = candidate.douban_celebrity_id.clone();
                    found.last_updated_at = now;

                    sqlx::query(
                        "UPDATE person_identity_map
                         SET tmdb_person_id = ?, emby_person_id = ?, imdb_id = ?, douban_celebrity_id = ?,
                             last_updated_at = ?
                         WHERE map_id = ?",
                    )
                    .bind(&found.tmdb_person_id)
                    .bind(&found.emby_person_id)
                    .bind(&found.imdb_id)
                    .bind(&found.douban_celebrity_id)
                    .bind(found.last_updated_at)
                    .bind(found.map_id)
                    .execute(&mut *tx)
                    .await?;
                }

                tx.commit().await?;
                return Ok(found);
            }
        }

        let inserted = sqlx::query(
            "INSERT INTO person_identity_map
                (primary_name, tmdb_person_id, emby_person_id, imdb_id, douban_celebrity_id, last_updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING map_id",
        )
        .bind(&candidate.name)
        .bind(&candidate.tmdb_person_id)
        .bind(&candidate.emby_person_id)
        .bind(&candidate.imdb_id)
        .bind(&candidate.douban_celebrity_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let map_id: i64 = inserted.get("map_id");
        tx.commit().await?;

        Ok(PersonIdentity {
            map_id,
            primary_name: candidate.name,
            tmdb_person_id: candidate.tmdb_person_id,
            emby_person_id: candidate.emby_person_id,
            imdb_id: candidate.imdb_id,
            douban_celebrity_id: candidate.douban_celebrity_id,
            last_synced_at: None,
            last_updated_at: now,
        })
    }

    async fn find_by_id(&self, map_id: i64) -> Result<Option<PersonIdentity>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM person_identity_map WHERE map_id = ?"))
            .bind(map_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_identity))
    }

    async fn find_by_tmdb_id(&self, tmdb_person_id: &str) -> Result<Option<PersonIdentity>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM person_identity_map WHERE tmdb_person_id = ?"))
            .bind(tmdb_person_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_identity))
    }

    async fn find_by_douban_id(&self, douban_celebrity_id: &str) -> Result<Option<PersonIdentity>, RepositoryError> {
        let row = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM person_identity_map WHERE douban_celebrity_id = ?"
        ))
        .bind(douban_celebrity_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(row_to_identity))
    }

    async fn find_by_imdb_id(&self, imdb_id: &str) -> Result<Option<PersonIdentity>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM person_identity_map WHERE imdb_id = ?"))
            .bind(imdb_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_identity))
    }

    async fn set_imdb_id(&self, map_id: i64, imdb_id: &str) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE person_identity_map SET imdb_id = ?, last_synced_at = ? WHERE map_id = ?")
            .bind(imdb_id)
            .bind(Utc::now())
            .bind(map_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn touch_last_synced(&self, map_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE person_identity_map SET last_synced_at = ? WHERE map_id = ?")
            .bind(Utc::now())
            .bind(map_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, map_id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM person_identity_map WHERE map_id = ?")
            .bind(map_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_missing_imdb_with_tmdb_id(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PersonIdentity>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM person_identity_map
             WHERE imdb_id IS NULL AND tmdb_person_id IS NOT NULL
             ORDER BY map_id ASC LIMIT ? OFFSET ?"
        ))
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(row_to_identity).collect())
    }

    async fn find_missing_imdb_with_douban_id(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<PersonIdentity>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM person_identity_map
             WHERE imdb_id IS NULL AND douban_celebrity_id IS NOT NULL
             ORDER BY map_id ASC LIMIT ? OFFSET ?"
        ))
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(row_to_identity).collect())
    }

    async fn count(&self) -> Result<i64, RepositoryError> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM person_identity_map").fetch_one(&self.pool).await?;
        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup() -> SqliteIdentityRepository {
        let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
        crate::infrastructure::database::initialize_schema(&pool).await.unwrap();
        SqliteIdentityRepository::new(pool)
    }

    #[tokio::test]
    async fn insert_creates_a_new_row() {
        let repo = setup().await;
        let identity = repo
            .upsert(UpsertCandidate { name: Some("Jon Hamm".into()), tmdb_person_id: Some("1".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(identity.tmdb_person_id.as_deref(), Some("1"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn id_based_merge_keeps_smallest_map_id_and_deletes_others() {
        let repo = setup().await;
        let a = repo
            .upsert(UpsertCandidate { tmdb_person_id: Some("1".into()), ..Default::default() })
            .await
            .unwrap();
        let b = repo
            .upsert(UpsertCandidate { douban_celebrity_id: Some("d1".into()), ..Default::default() })
            .await
            .unwrap();
        assert_ne!(a.map_id, b.map_id);

        let merged = repo
            .upsert(UpsertCandidate {
                name: Some("Jon Hamm".into()),
                tmdb_person_id: Some("1".into()),
                douban_celebrity_id: Some("d1".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(merged.map_id, a.map_id.min(b.map_id));
        assert_eq!(merged.tmdb_person_id.as_deref(), Some("1"));
        assert_eq!(merged.douban_celebrity_id.as_deref(), Some("d1"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn name_based_soft_merge_fills_ids_on_a_clean_row() {
        let repo = setup().await;
        repo.upsert(UpsertCandidate { name: Some("Jon Hamm".into()), ..Default::default() }).await.unwrap();

        let merged = repo
            .upsert(UpsertCandidate { name: Some("Jon Hamm".into()), tmdb_person_id: Some("1".into()), ..Default::default() })
            .await
            .unwrap();

        assert_eq!(merged.tmdb_person_id.as_deref(), Some("1"));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn same_name_different_person_does_not_fuse_when_row_already_has_an_id() {
        let repo = setup().await;
        repo.upsert(UpsertCandidate { name: Some("Jon Hamm".into()), tmdb_person_id: Some("1".into()), ..Default::default() })
            .await
            .unwrap();

        let second = repo
            .upsert(UpsertCandidate { name: Some("Jon Hamm".into()), tmdb_person_id: Some("2".into()), ..Default::default() })
            .await
            .unwrap();

        assert_eq!(second.tmdb_person_id.as_deref(), Some("2"));
        assert_eq!(repo.count().await.unwrap(), 2);
    }
}
