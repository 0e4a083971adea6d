//! Override writer (C10): persists the processed cast list into the
//! side-load override directory without disturbing anything else in the
//! source cache JSON (spec.md §4.4, §6).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::domain::entities::CastMember;
use crate::domain::services::override_cast::to_override_cast_array;
use crate::domain::value_objects::ItemType;
use crate::infrastructure::filesystem::local_cache_reader::LocalCacheReader;
use crate::interfaces::external_services::{ImageKind, MediaServerService};
use crate::interfaces::filesystem::FileOperations;
use crate::shared::error::OverrideError;

fn tmdb_type_dir(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Movie => "tmdb-movies2",
        ItemType::Series | ItemType::Episode | ItemType::Season => "tmdb-tv",
    }
}

pub struct OverrideWriter {
    root: PathBuf,
    cache_reader: Arc<LocalCacheReader>,
    file_ops: Arc<dyn FileOperations>,
    inter_call_delay: Duration,
}

impl OverrideWriter {
    pub fn new(root: impl Into<PathBuf>, cache_reader: Arc<LocalCacheReader>, file_ops: Arc<dyn FileOperations>) -> Self {
        Self { root: root.into(), cache_reader, file_ops, inter_call_delay: Duration::ZERO }
    }

    /// Throttles the per-sidecar writes in `mirror_to_sidecars`, mirroring
    /// the original's delay between consecutive season/episode cast pushes.
    pub fn with_inter_call_delay(mut self, delay: Duration) -> Self {
        self.inter_call_delay = delay;
        self
    }

    fn override_item_dir(&self, item_type: ItemType, tmdb_id: &str) -> PathBuf {
        self.root.join("override").join(tmdb_type_dir(item_type)).join(tmdb_id)
    }

    /// Write-then-rename so a reader never observes a half-written file.
    /// The temp name carries a random suffix: the webhook handler and a
    /// running scan are never serialized against each other (spec.md §5),
    /// so two writers racing on the same destination must not collide on
    /// the same temp path.
    async fn write_atomic(&self, dest: &Path, contents: &str) -> Result<(), OverrideError> {
        let dest_str = dest.to_string_lossy().to_string();
        let tmp_str = format!("{dest_str}.{}.tmp", uuid::Uuid::new_v4());
        self.file_ops.write_string(&tmp_str, contents).await?;
        self.file_ops.move_file(&tmp_str, &dest_str).await?;
        Ok(())
    }

    fn replace_cast(source: &Value, path: &[&str], cast_array: Value) -> Result<Value, OverrideError> {
        let mut cloned = source.clone();
        let mut cursor = &mut cloned;
        for (i, segment) in path.iter().enumerate() {
            let is_last = i == path.len() - 1;
            let object = cursor
                .as_object_mut()
                .ok_or_else(|| OverrideError::InvalidSourceJson(format!("expected object at {segment}")))?;
            if is_last {
                object.insert((*segment).to_string(), cast_array.clone());
                break;
            }
            cursor = object.entry(*segment).or_insert_with(|| Value::Object(Default::default()));
        }
        Ok(cloned)
    }

    /// Movie cast replaces `casts.cast` (spec.md §6).
    pub async fn write_movie_cast(&self, tmdb_id: &str, cast: &[CastMember]) -> Result<(), OverrideError> {
        let source = self
            .cache_reader
            .read_movie(tmdb_id)
            .await?
            .ok_or_else(|| OverrideError::SourceNotFound(tmdb_id.to_string()))?;

        let updated = Self::replace_cast(&source, &["casts", "cast"], to_override_cast_array(cast))?;
        let dest = self.override_item_dir(ItemType::Movie, tmdb_id).join("all.json");
        let contents = serde_json::to_string_pretty(&updated)?;
        self.write_atomic(&dest, &contents).await?;
        Ok(())
    }

    /// Series cast replaces `credits.cast` on `series.json`, and, when
    /// `process_episodes` is set, is mirrored onto every cached
    /// `season-*.json` / `season-*-episode-*.json` sidecar too.
    pub async fn write_series_cast(
        &self,
        tmdb_id: &str,
        cast: &[CastMember],
        process_episodes: bool,
    ) -> Result<(), OverrideError> {
        let source = self
            .cache_reader
            .read_series(tmdb_id)
            .await?
            .ok_or_else(|| OverrideError::SourceNotFound(tmdb_id.to_string()))?;

        let cast_array = to_override_cast_array(cast);
        let updated = Self::replace_cast(&source, &["credits", "cast"], cast_array.clone())?;
        let dest = self.override_item_dir(ItemType::Series, tmdb_id).join("series.json");
        let contents = serde_json::to_string_pretty(&updated)?;
        self.write_atomic(&dest, &contents).await?;

        if process_episodes {
            self.mirror_to_sidecars(tmdb_id, &cast_array).await?;
        }
        Ok(())
    }

    async fn mirror_to_sidecars(&self, tmdb_id: &str, cast_array: &Value) -> Result<(), OverrideError> {
        let source_dir = self.cache_reader.tmdb_item_dir(ItemType::Series, tmdb_id);
        let dest_dir = self.override_item_dir(ItemType::Series, tmdb_id);
        for name in self.cache_reader.list_series_sidecars(tmdb_id).await? {
            let source_path = source_dir.join(&name);
            let source_str = source_path.to_string_lossy().to_string();
            let raw = self.file_ops.read_string(&source_str).await?;
            let parsed: Value =
                serde_json::from_str(&raw).map_err(|e| OverrideError::InvalidSourceJson(format!("{name}: {e}")))?;
            let updated = Self::replace_cast(&parsed, &["credits", "cast"], cast_array.clone())?;
            let contents = serde_json::to_string_pretty(&updated)?;
            self.write_atomic(&dest_dir.join(&name), &contents).await?;
            if !self.inter_call_delay.is_zero() {
                tokio::time::sleep(self.inter_call_delay).await;
            }
        }
        Ok(())
    }

    /// Image sync: downloads the fixed set of item-level image kinds plus
    /// a `season-<n>.jpg` / `season-<n>-episode-<m>.jpg` per season/episode
    /// into `<override_dir>/images/` (spec.md §4.4, triggered off an
    /// image-updated webhook).
    pub async fn sync_images(
        &self,
        media_server: &dyn MediaServerService,
        item_type: ItemType,
        tmdb_id: &str,
        item_id: &str,
        seasons_and_episodes: &[(i32, Option<i32>)],
    ) -> Result<(), OverrideError> {
        let images_dir = self.override_item_dir(item_type, tmdb_id).join("images");
        for kind in [ImageKind::Primary, ImageKind::Backdrop, ImageKind::Logo] {
            let file_name = match kind {
                ImageKind::Primary => "poster.jpg",
                ImageKind::Backdrop => "fanart.jpg",
                ImageKind::Logo => "clearlogo.png",
            };
            let dest = images_dir.join(file_name).to_string_lossy().to_string();
            media_server.download_image(item_id, kind, &dest).await?;
        }

        for (season, episode) in seasons_and_episodes {
            let file_name = match episode {
                Some(ep) => format!("season-{season}-episode-{ep}.jpg"),
                None => format!("season-{season}.jpg"),
            };
            let dest = images_dir.join(file_name).to_string_lossy().to_string();
            media_server.download_image(item_id, ImageKind::Primary, &dest).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::filesystem::FileOperationsAdapter;

    fn writer(root: &Path) -> OverrideWriter {
        let file_ops: Arc<dyn FileOperations> = Arc::new(FileOperationsAdapter::new());
        let cache_reader = Arc::new(LocalCacheReader::new(root.to_path_buf(), file_ops.clone()));
        OverrideWriter::new(root.to_path_buf(), cache_reader, file_ops)
    }

    fn member(id: &str, name: &str, role: &str, order: i32) -> CastMember {
        CastMember {
            tmdb_person_id: Some(id.to_string()),
            douban_celebrity_id: None,
            emby_person_id: None,
            name: name.to_string(),
            original_name: None,
            role: role.to_string(),
            order: Some(order),
            profile_path: None,
        }
    }

    #[tokio::test]
    async fn missing_source_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = writer(dir.path()).write_movie_cast("603", &[]).await.unwrap_err();
        assert!(matches!(err, OverrideError::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn movie_override_preserves_other_fields_and_replaces_cast() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("cache/tmdb-movies2/603");
        std::fs::create_dir_all(&cache_dir).unwrap();
        std::fs::write(
            cache_dir.join("all.json"),
            r#"{"id":603,"title":"The Matrix","casts":{"cast":[{"id":1,"name":"old"}]}}"#,
        )
        .unwrap();

        writer(dir.path())
            .write_movie_cast("603", &[member("6384", "基努·里维斯", "尼奥", 0)])
            .await
            .unwrap();

        let written = std::fs::read_to_string(dir.path().join("override/tmdb-movies2/603/all.json")).unwrap();
        let value: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["title"], "The Matrix");
        assert_eq!(value["casts"]["cast"][0]["name"], "基努·里维斯");
        assert_eq!(value["casts"]["cast"][0]["character"], "尼奥");
    }

    #[tokio::test]
    async fn series_override_mirrors_to_episode_sidecars_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("cache/tmdb-tv/1396");
        std::fs::create_dir_all(&cache_dir).unwrap();
        std::fs::write(cache_dir.join("series.json"), r#"{"name":"Breaking Bad","credits":{"cast":[]}}"#).unwrap();
        std::fs::write(
            cache_dir.join("season-1-episode-1.json"),
            r#"{"name":"Pilot","credits":{"cast":[]}}"#,
        )
        .unwrap();

        writer(dir.path())
            .write_series_cast("1396", &[member("17419", "布莱恩·克兰斯顿", "沃尔特·怀特", 0)], true)
            .await
            .unwrap();

        let series_json = std::fs::read_to_string(dir.path().join("override/tmdb-tv/1396/series.json")).unwrap();
        let series_value: Value = serde_json::from_str(&series_json).unwrap();
        assert_eq!(series_value["credits"]["cast"][0]["name"], "布莱恩·克兰斯顿");

        let episode_json =
            std::fs::read_to_string(dir.path().join("override/tmdb-tv/1396/season-1-episode-1.json")).unwrap();
        let episode_value: Value = serde_json::from_str(&episode_json).unwrap();
        assert_eq!(episode_value["name"], "Pilot");
        assert_eq!(episode_value["credits"]["cast"][0]["character"], "沃尔特·怀特");
    }

    #[tokio::test]
    async fn series_override_skips_sidecars_when_not_requested() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("cache/tmdb-tv/1396");
        std::fs::create_dir_all(&cache_dir).unwrap();
        std::fs::write(cache_dir.join("series.json"), r#"{"credits":{"cast":[]}}"#).unwrap();
        std::fs::write(cache_dir.join("season-1-episode-1.json"), r#"{"credits":{"cast":[]}}"#).unwrap();

        writer(dir.path()).write_series_cast("1396", &[], false).await.unwrap();

        assert!(!dir.path().join("override/tmdb-tv/1396/season-1-episode-1.json").exists());
    }

    #[tokio::test]
    async fn inter_call_delay_throttles_sidecar_mirroring_without_dropping_writes() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("cache/tmdb-tv/1396");
        std::fs::create_dir_all(&cache_dir).unwrap();
        std::fs::write(cache_dir.join("series.json"), r#"{"credits":{"cast":[]}}"#).unwrap();
        std::fs::write(cache_dir.join("season-1-episode-1.json"), r#"{"credits":{"cast":[]}}"#).unwrap();
        std::fs::write(cache_dir.join("season-1-episode-2.json"), r#"{"credits":{"cast":[]}}"#).unwrap();

        let file_ops: Arc<dyn FileOperations> = Arc::new(FileOperationsAdapter::new());
        let cache_reader = Arc::new(LocalCacheReader::new(dir.path().to_path_buf(), file_ops.clone()));
        let throttled = OverrideWriter::new(dir.path().to_path_buf(), cache_reader, file_ops)
            .with_inter_call_delay(Duration::from_millis(10));

        let started = std::time::Instant::now();
        throttled
            .write_series_cast("1396", &[member("17419", "布莱恩·克兰斯顿", "沃尔特·怀特", 0)], true)
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20), "two sidecars must each incur the configured delay");

        assert!(dir.path().join("override/tmdb-tv/1396/season-1-episode-1.json").exists());
        assert!(dir.path().join("override/tmdb-tv/1396/season-1-episode-2.json").exists());
    }

    #[tokio::test]
    async fn concurrent_movie_writes_do_not_collide_on_the_same_temp_path() {
        let dir = tempfile::tempdir().unwrap();
        let cache_dir = dir.path().join("cache/tmdb-movies2/603");
        std::fs::create_dir_all(&cache_dir).unwrap();
        std::fs::write(cache_dir.join("all.json"), r#"{"casts":{"cast":[]}}"#).unwrap();

        let w = Arc::new(writer(dir.path()));
        let (a, b) = (w.clone(), w.clone());
        let cast_a = vec![member("1", "甲", "角色甲", 0)];
        let cast_b = vec![member("2", "乙", "角色乙", 0)];
        let (r1, r2) = tokio::join!(
            a.write_movie_cast("603", &cast_a),
            b.write_movie_cast("603", &cast_b),
        );
        r1.unwrap();
        r2.unwrap();

        let written = std::fs::read_to_string(dir.path().join("override/tmdb-movies2/603/all.json")).unwrap();
        let value: Value = serde_json::from_str(&written).unwrap();
        let name = value["casts"]["cast"][0]["name"].as_str().unwrap();
        assert!(name == "甲" || name == "乙", "the winning write must be fully-formed, not corrupted");
    }
}
