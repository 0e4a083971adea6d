//! Douban Adapter Interface (C6, spec.md §6)

use async_trait::async_trait;

use crate::shared::error::DoubanError;

#[async_trait]
pub trait DoubanService: Send + Sync {
    /// `GetActing(name, imdbId?, type, year?, doubanIdOverride?)`.
    async fn get_acting(
        &self,
        name: &str,
        imdb_id: Option<&str>,
        item_type: &str,
        year: Option<i32>,
        douban_id_override: Option<&str>,
    ) -> Result<DoubanActingResult, DoubanError>;

    async fn get_celebrity_details(&self, douban_id: &str) -> Result<DoubanCelebrityDetails, DoubanError>;
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DoubanActingResult {
    pub cast: Vec<DoubanActor>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DoubanActor {
    pub id: String,
    pub name: String,
    pub original_name: String,
    pub character: String,
}

/// `extra.info` is a flat `[[key, value], ...]` array upstream; the adapter
/// exposes the one entry the enricher needs directly.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DoubanCelebrityDetails {
    pub id: String,
    pub name: String,
    pub imdb_id: Option<String>,
}
