//! Database Schema Management
//!
//! Provides schema initialization and migrations for the identity map,
//! translation cache, audit log, collection engine, and task manager
//! tables. Migrated to align with the reconciliation pipeline's data
//! model.

use sqlx::{Pool, Sqlite};
use tracing::info;

/// Initialize all database tables
///
/// Creates tables if they don't exist and applies column migrations.
/// This is idempotent - safe to call multiple times.
pub async fn initialize_schema(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    info!("Initializing database schema");

    // 1. Person identity map (C1)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS person_identity_map (
            map_id INTEGER PRIMARY KEY AUTOINCREMENT,
            primary_name TEXT,
            tmdb_person_id TEXT UNIQUE,
            emby_person_id TEXT UNIQUE,
            imdb_id TEXT UNIQUE,
            douban_celebrity_id TEXT UNIQUE,
            last_synced_at DATETIME,
            last_updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_identity_primary_name ON person_identity_map(primary_name)")
        .execute(pool)
        .await?;

    // 2. Translation cache (C2)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS translation_cache (
            source_text TEXT PRIMARY KEY,
            translated_text TEXT,
            engine_used TEXT NOT NULL,
            updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .execute(pool)
    .await?;

    // 3. Processed / failed log (C3)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS processed_log (
            item_id TEXT PRIMARY KEY,
            item_name TEXT NOT NULL,
            quality_score REAL NOT NULL,
            processed_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS failed_log (
            item_id TEXT PRIMARY KEY,
            item_name TEXT NOT NULL,
            reason TEXT NOT NULL,
            failed_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_processed_log_score ON processed_log(quality_score)")
        .execute(pool)
        .await?;

    // 4. Media metadata snapshot, for the filter-sourced collection engine
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS media_metadata (
            tmdb_id TEXT PRIMARY KEY,
            item_type TEXT NOT NULL,
            title TEXT NOT NULL,
            release_year INTEGER,
            release_date TEXT,
            rating REAL,
            genres TEXT NOT NULL DEFAULT '[]',
            actors TEXT NOT NULL DEFAULT '[]',
            directors TEXT NOT NULL DEFAULT '[]',
            studios TEXT NOT NULL DEFAULT '[]',
            countries TEXT NOT NULL DEFAULT '[]',
            in_library INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await?;

    // 5. Watchlist (C13 / webhook item-added processing)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS watchlist (
            tmdb_id TEXT PRIMARY KEY,
            item_type TEXT NOT NULL,
            title TEXT NOT NULL,
            added_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            resolved INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )
    .execute(pool)
    .await?;

    // 6. Actor subscriptions
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS actor_subscription (
            person_map_id INTEGER PRIMARY KEY REFERENCES person_identity_map(map_id) ON DELETE CASCADE,
            display_name TEXT NOT NULL,
            subscribed_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
            known_credit_tmdb_ids TEXT NOT NULL DEFAULT '[]'
        );
        "#,
    )
    .execute(pool)
    .await?;

    // 7. Custom collections (C14) and their resolved membership snapshot
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS custom_collection (
            collection_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            definition_json TEXT NOT NULL,
            emby_collection_id TEXT,
            last_refreshed_at DATETIME
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS collection_info (
            collection_id INTEGER NOT NULL REFERENCES custom_collection(collection_id) ON DELETE CASCADE,
            tmdb_id TEXT NOT NULL,
            title TEXT NOT NULL,
            status TEXT NOT NULL,
            subscribed INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (collection_id, tmdb_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    apply_column_migrations(pool).await?;

    info!("Database schema initialized successfully");
    Ok(())
}

/// Apply column migrations for existing tables
///
/// Uses ALTER TABLE to add columns that may not exist in older schemas.
/// All operations are idempotent (silently ignore if column exists).
async fn apply_column_migrations(pool: &Pool<Sqlite>) -> Result<(), sqlx::Error> {
    let identity_columns = ["ALTER TABLE person_identity_map ADD COLUMN last_synced_at DATETIME"];
    for sql in &identity_columns {
        let _ = sqlx::query(sql).execute(pool).await;
    }

    let collection_info_columns = ["ALTER TABLE collection_info ADD COLUMN subscribed INTEGER NOT NULL DEFAULT 0"];
    for sql in &collection_info_columns {
        let _ = sqlx::query(sql).execute(pool).await;
    }

    Ok(())
}
