//! Read-only local cache reader (C7): resolves TMDb and Douban cache JSON
//! sidecars under `<root>/cache/...` (spec.md §6, "Local-cache file layout").

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::value_objects::ItemType;
use crate::interfaces::filesystem::FileOperations;
use crate::shared::error::FilesystemError;

fn tmdb_type_dir(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Movie => "tmdb-movies2",
        ItemType::Series | ItemType::Episode | ItemType::Season => "tmdb-tv",
    }
}

fn douban_type_dir(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Movie => "douban-movies",
        ItemType::Series | ItemType::Episode | ItemType::Season => "douban-tv",
    }
}

pub struct LocalCacheReader {
    root: PathBuf,
    file_ops: Arc<dyn FileOperations>,
}

impl LocalCacheReader {
    pub fn new(root: impl Into<PathBuf>, file_ops: Arc<dyn FileOperations>) -> Self {
        Self { root: root.into(), file_ops }
    }

    pub fn tmdb_item_dir(&self, item_type: ItemType, tmdb_id: &str) -> PathBuf {
        self.root.join("cache").join(tmdb_type_dir(item_type)).join(tmdb_id)
    }

    async fn read_json(&self, path: &std::path::Path) -> Result<Option<Value>, FilesystemError> {
        let path_str = path.to_string_lossy().to_string();
        if !self.file_ops.exists(&path_str).await? {
            return Ok(None);
        }
        let contents = self.file_ops.read_string(&path_str).await?;
        let value: Value = serde_json::from_str(&contents)
            .map_err(|e| FilesystemError::InvalidPath(format!("{path_str}: {e}")))?;
        Ok(Some(value))
    }

    /// `<root>/cache/tmdb-movies2/<tmdb_id>/all.json`.
    pub async fn read_movie(&self, tmdb_id: &str) -> Result<Option<Value>, FilesystemError> {
        let path = self.tmdb_item_dir(ItemType::Movie, tmdb_id).join("all.json");
        self.read_json(&path).await
    }

    /// `<root>/cache/tmdb-tv/<tmdb_id>/series.json`.
    pub async fn read_series(&self, tmdb_id: &str) -> Result<Option<Value>, FilesystemError> {
        let path = self.tmdb_item_dir(ItemType::Series, tmdb_id).join("series.json");
        self.read_json(&path).await
    }

    pub async fn read_season(&self, tmdb_id: &str, season: i32) -> Result<Option<Value>, FilesystemError> {
        let path = self.tmdb_item_dir(ItemType::Season, tmdb_id).join(format!("season-{season}.json"));
        self.read_json(&path).await
    }

    pub async fn read_episode(&self, tmdb_id: &str, season: i32, episode: i32) -> Result<Option<Value>, FilesystemError> {
        let path = self
            .tmdb_item_dir(ItemType::Episode, tmdb_id)
            .join(format!("season-{season}-episode-{episode}.json"));
        self.read_json(&path).await
    }

    /// Names of every cached `season-*.json` / `season-*-episode-*.json`
    /// sidecar for a series, used by the override writer to mirror the
    /// final cast list across all of them (spec.md §4.4).
    pub async fn list_series_sidecars(&self, tmdb_id: &str) -> Result<Vec<String>, FilesystemError> {
        let dir = self.tmdb_item_dir(ItemType::Series, tmdb_id);
        let dir_str = dir.to_string_lossy().to_string();
        if !self.file_ops.exists(&dir_str).await? {
            return Ok(Vec::new());
        }
        let mut names = self.file_ops.list_dir(&dir_str).await?;
        names.retain(|n| n.starts_with("season-") && n.ends_with(".json"));
        names.sort();
        Ok(names)
    }

    /// Douban payload, searched by either directory-naming convention
    /// (spec.md §6: directories are named `<doubanId>_*` or contain the
    /// imdb id in the dir name; the reader searches both).
    pub async fn read_douban(
        &self,
        item_type: ItemType,
        douban_id: Option<&str>,
        imdb_id: Option<&str>,
    ) -> Result<Option<Value>, FilesystemError> {
        let type_dir = self.root.join("cache").join(douban_type_dir(item_type));
        let type_dir_str = type_dir.to_string_lossy().to_string();
        if !self.file_ops.exists(&type_dir_str).await? {
            return Ok(None);
        }
        let entries = self.file_ops.list_dir(&type_dir_str).await?;
        let matching_dir = entries.iter().find(|name| {
            douban_id.is_some_and(|id| name.starts_with(&format!("{id}_")))
                || imdb_id.is_some_and(|id| name.contains(id))
        });
        let Some(dir_name) = matching_dir else { return Ok(None) };
        let candidate_dir = type_dir.join(dir_name);
        let candidate_dir_str = candidate_dir.to_string_lossy().to_string();
        let files = self.file_ops.list_dir(&candidate_dir_str).await?;
        let Some(json_file) = files.iter().find(|f| f.ends_with(".json")) else { return Ok(None) };
        self.read_json(&candidate_dir.join(json_file)).await
    }
}
