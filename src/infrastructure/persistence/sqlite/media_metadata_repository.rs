//! SQLite implementation of MediaMetadataRepository — backs the
//! filter-sourced collection engine (spec.md §4.8).

use async_trait::async_trait;
use sqlx::{Pool, Row, Sqlite};

use crate::domain::entities::MediaMetadata;
use crate::domain::repositories::MediaMetadataRepository;
use crate::domain::value_objects::ItemType;
use crate::shared::error::RepositoryError;

pub struct SqliteMediaMetadataRepository {
    pool: Pool<Sqlite>,
}

impl SqliteMediaMetadataRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }
}

fn item_type_str(item_type: ItemType) -> &'static str {
    item_type.as_str()
}

fn parse_item_type(s: &str) -> ItemType {
    match s {
        "Series" => ItemType::Series,
        "Episode" => ItemType::Episode,
        "Season" => ItemType::Season,
        _ => ItemType::Movie,
    }
}

fn row_to_metadata(row: &sqlx::sqlite::SqliteRow) -> Result<MediaMetadata, RepositoryError> {
    let genres: String = row.get("genres");
    let actors: String = row.get("actors");
    let directors: String = row.get("directors");
    let studios: String = row.get("studios");
    let countries: String = row.get("countries");

    Ok(MediaMetadata {
        tmdb_id: row.get("tmdb_id"),
        item_type: parse_item_type(&row.get::<String, _>("item_type")),
        title: row.get("title"),
        release_year: row.get("release_year"),
        release_date: row.get("release_date"),
        rating: row.get("rating"),
        genres: serde_json::from_str(&genres)?,
        actors: serde_json::from_str(&actors)?,
        directors: serde_json::from_str(&directors)?,
        studios: serde_json::from_str(&studios)?,
        countries: serde_json::from_str(&countries)?,
        in_library: row.get::<i64, _>("in_library") != 0,
    })
}

#[async_trait]
impl MediaMetadataRepository for SqliteMediaMetadataRepository {
    async fn upsert(&self, metadata: MediaMetadata) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO media_metadata
                (tmdb_id, item_type, title, release_year, release_date, rating, genres, actors, directors, studios, countries, in_library)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(tmdb_id) DO UPDATE SET
                item_type = excluded.item_type,
                title = excluded.title,
                release_year = excluded.release_year,
                release_date = excluded.release_date,
                rating = excluded.rating,
                genres = excluded.genres,
                actors = excluded.actors,
                directors = excluded.directors,
                studios = excluded.studios,
                countries = excluded.countries,
                in_library = excluded.in_library",
        )
        .bind(&metadata.tmdb_id)
        .bind(item_type_str(metadata.item_type))
        .bind(&metadata.title)
        .bind(metadata.release_year)
        .bind(&metadata.release_date)
        .bind(metadata.rating)
        .bind(serde_json::to_string(&metadata.genres)?)
        .bind(serde_json::to_string(&metadata.actors)?)
        .bind(serde_json::to_string(&metadata.directors)?)
        .bind(serde_json::to_string(&metadata.studios)?)
        .bind(serde_json::to_string(&metadata.countries)?)
        .bind(metadata.in_library as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_tmdb_id(&self, tmdb_id: &str) -> Result<Option<MediaMetadata>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM media_metadata WHERE tmdb_id = ?")
            .bind(tmdb_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_metadata).transpose()
    }

    async fn find_all(&self) -> Result<Vec<MediaMetadata>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM media_metadata").fetch_all(&self.pool).await?;
        rows.iter().map(row_to_metadata).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup() -> SqliteMediaMetadataRepository {
        let pool = SqlitePoolOptions::new().max_connections(1).connect("sqlite::memory:").await.unwrap();
        crate::infrastructure::database::initialize_schema(&pool).await.unwrap();
        SqliteMediaMetadataRepository::new(pool)
    }

    fn sample() -> MediaMetadata {
        MediaMetadata {
            tmdb_id: "603".into(),
            item_type: ItemType::Movie,
            title: "The Matrix".into(),
            release_year: Some(1999),
            release_date: Some("1999-03-31".into()),
            rating: Some(8.2),
            genres: vec!["Action".into(), "Science Fiction".into()],
            actors: vec!["Keanu Reeves".into()],
            directors: vec!["Lana Wachowski".into()],
            studios: vec!["Warner Bros.".into()],
            countries: vec!["US".into()],
            in_library: true,
        }
    }

    #[tokio::test]
    async fn round_trips_list_columns() {
        let repo = setup().await;
        repo.upsert(sample()).await.unwrap();
        let found = repo.find_by_tmdb_id("603").await.unwrap().unwrap();
        assert_eq!(found.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(found.item_type, ItemType::Movie);
    }

    #[tokio::test]
    async fn upsert_overwrites_existing_row() {
        let repo = setup().await;
        repo.upsert(sample()).await.unwrap();
        let mut updated = sample();
        updated.in_library = false;
        updated.rating = Some(8.7);
        repo.upsert(updated).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].rating, Some(8.7));
        assert!(!all[0].in_library);
    }
}
