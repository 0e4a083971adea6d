//! Custom Collection Engine (C14, spec.md §4.8).
//!
//! Two collection kinds share the same `refresh_all` entry point: a
//! list-sourced collection resolves an external provider's list to TMDb ids
//! and tracks per-member fulfilment status; a filter-sourced collection
//! re-evaluates a predicate tree over the local metadata snapshot on every
//! refresh and tracks no per-member status.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use crate::domain::entities::{CollectionInfo, CustomCollection};
use crate::domain::repositories::{CollectionRepository, MediaMetadataRepository};
use crate::domain::services::matches_filter;
use crate::domain::value_objects::{
    derive_health, CollectionDefinition, HealthStatus, ItemType, MemberStatus,
};
use crate::infrastructure::jobs::TaskHandle;
use crate::interfaces::external_services::{
    MediaServerService, SubscribeService, TmdbTitleService,
};
use crate::shared::error::{ApplicationError, CollectionError};

pub struct CollectionEngine {
    collection_repo: Arc<dyn CollectionRepository>,
    media_metadata_repo: Arc<dyn MediaMetadataRepository>,
    media_server: Arc<dyn MediaServerService>,
    tmdb: Arc<dyn TmdbTitleService>,
    subscribe_adapter: Arc<dyn SubscribeService>,
}

impl CollectionEngine {
    pub fn new(
        collection_repo: Arc<dyn CollectionRepository>,
        media_metadata_repo: Arc<dyn MediaMetadataRepository>,
        media_server: Arc<dyn MediaServerService>,
        tmdb: Arc<dyn TmdbTitleService>,
        subscribe_adapter: Arc<dyn SubscribeService>,
    ) -> Self {
        Self { collection_repo, media_metadata_repo, media_server, tmdb, subscribe_adapter }
    }

    /// Refreshes every saved collection. A failure on one collection is
    /// logged and does not stop the remaining collections from refreshing.
    pub async fn refresh_all(&self, handle: Option<&TaskHandle>) -> Result<(), ApplicationError> {
        let collections = self.collection_repo.find_all().await.map_err(CollectionError::Repository)?;

        for (index, collection) in collections.iter().enumerate() {
            if let Some(handle) = handle {
                if handle.is_cancelled() {
                    return Err(crate::shared::error::TaskError::Cancelled.into());
                }
                handle
                    .set_progress(
                        ((index * 100) / collections.len().max(1)) as i32,
                        format!("refreshing {}", collection.name),
                    )
                    .await;
            }

            let result = match &collection.definition {
                CollectionDefinition::List { .. } => self.refresh_list(collection).await,
                CollectionDefinition::Filter { .. } => self.refresh_filter(collection).await,
            };

            if let Err(error) = result {
                warn!(collection = %collection.name, %error, "collection refresh failed");
            }
        }

        Ok(())
    }

    async fn refresh_list(&self, collection: &CustomCollection) -> Result<(), ApplicationError> {
        let CollectionDefinition::List { provider, list_id } = &collection.definition else {
            return Ok(());
        };

        if provider != "tmdb_collection" {
            return Err(CollectionError::UnknownProvider(provider.clone()).into());
        }

        let collection_id: i64 = list_id
            .parse()
            .map_err(|_| CollectionError::UnknownProvider(format!("non-numeric list_id: {list_id}")))?;

        let details = self.tmdb.get_collection_details(collection_id).await.map_err(CollectionError::Tmdb)?;

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let previous = self
            .collection_repo
            .find_members(collection.collection_id)
            .await
            .map_err(CollectionError::Repository)?;
        let previous_by_id: HashMap<&str, &CollectionInfo> =
            previous.iter().map(|m| (m.tmdb_id.as_str(), m)).collect();

        let mut members = Vec::with_capacity(details.parts.len());
        for part in &details.parts {
            let tmdb_id = part.tmdb_id.to_string();
            let local = self
                .media_metadata_repo
                .find_by_tmdb_id(&tmdb_id)
                .await
                .map_err(CollectionError::Repository)?;

            let status = if local.as_ref().is_some_and(|m| m.in_library) {
                MemberStatus::InLibrary
            } else {
                match &part.release_date {
                    Some(date) if date.as_str() <= today.as_str() => MemberStatus::Missing,
                    _ => MemberStatus::Unreleased,
                }
            };

            let info = CollectionInfo {
                collection_id: collection.collection_id,
                tmdb_id: tmdb_id.clone(),
                title: part.title.clone(),
                status,
                subscribed: false,
            }
            .carry_forward(previous_by_id.get(tmdb_id.as_str()).copied());

            members.push(info);
        }

        let tmdb_ids: Vec<String> = members.iter().map(|m| m.tmdb_id.clone()).collect();
        let (emby_collection_id, _) = self
            .media_server
            .create_or_update_collection(&collection.name, &tmdb_ids, ItemType::Movie)
            .await?;

        self.collection_repo.replace_members(collection.collection_id, members).await.map_err(CollectionError::Repository)?;

        let updated = CustomCollection {
            collection_id: collection.collection_id,
            name: collection.name.clone(),
            definition: collection.definition.clone(),
            emby_collection_id: Some(emby_collection_id),
            last_refreshed_at: Some(Utc::now()),
        };
        self.collection_repo.save(&updated).await.map_err(CollectionError::Repository)?;

        Ok(())
    }

    /// Filter-sourced collections hold titles of mixed `ItemType`; the media
    /// server's collection create call only uses `item_type` as a display
    /// hint (the adapter does not branch on it), so the majority type among
    /// matches is passed through and the minority is still appended.
    async fn refresh_filter(&self, collection: &CustomCollection) -> Result<(), ApplicationError> {
        let CollectionDefinition::Filter { predicate } = &collection.definition else {
            return Ok(());
        };

        let all_metadata = self.media_metadata_repo.find_all().await.map_err(CollectionError::Repository)?;
        let matched: Vec<_> = all_metadata.iter().filter(|m| matches_filter(predicate, m)).collect();

        if matched.is_empty() {
            return Ok(());
        }

        let mut movie_count = 0usize;
        let mut series_count = 0usize;
        for m in &matched {
            match m.item_type {
                ItemType::Movie => movie_count += 1,
                _ => series_count += 1,
            }
        }
        let dominant_type = if series_count > movie_count { ItemType::Series } else { ItemType::Movie };
        if movie_count > 0 && series_count > 0 {
            warn!(collection = %collection.name, movie_count, series_count, "filter collection matched mixed item types");
        }

        let tmdb_ids: Vec<String> = matched.iter().map(|m| m.tmdb_id.clone()).collect();
        let (emby_collection_id, _) = self
            .media_server
            .create_or_update_collection(&collection.name, &tmdb_ids, dominant_type)
            .await?;

        let updated = CustomCollection {
            collection_id: collection.collection_id,
            name: collection.name.clone(),
            definition: collection.definition.clone(),
            emby_collection_id: Some(emby_collection_id),
            last_refreshed_at: Some(Utc::now()),
        };
        self.collection_repo.save(&updated).await.map_err(CollectionError::Repository)?;

        Ok(())
    }

    /// For every list-sourced collection with missing, already-released
    /// members, hands each off to the external subscribe adapter and flips
    /// it to `Subscribed` on success (spec.md §4.8).
    pub async fn auto_subscribe(&self, handle: Option<&TaskHandle>) -> Result<(), ApplicationError> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let collections = self.collection_repo.find_all().await.map_err(CollectionError::Repository)?;

        for collection in &collections {
            if !matches!(collection.definition, CollectionDefinition::List { .. }) {
                continue;
            }

            if let Some(handle) = handle {
                if handle.is_cancelled() {
                    break;
                }
            }

            let mut members = self
                .collection_repo
                .find_members(collection.collection_id)
                .await
                .map_err(CollectionError::Repository)?;

            if derive_health(members.iter().map(|m| &m.status)) != HealthStatus::HasMissing {
                continue;
            }

            let mut changed = false;
            for member in members.iter_mut() {
                if member.status != MemberStatus::Missing {
                    continue;
                }

                let release_date = self
                    .media_metadata_repo
                    .find_by_tmdb_id(&member.tmdb_id)
                    .await
                    .map_err(CollectionError::Repository)?
                    .and_then(|m| m.release_date);

                let is_released = release_date.is_some_and(|d| d.as_str() <= today.as_str());
                if !is_released {
                    continue;
                }

                match self.subscribe_adapter.subscribe(&member.tmdb_id, ItemType::Movie, &member.title).await {
                    Ok(()) => {
                        member.status = MemberStatus::Subscribed;
                        member.subscribed = true;
                        changed = true;
                        if let Some(handle) = handle {
                            handle.log(format!("subscribed {}", member.title)).await;
                        }
                    }
                    Err(error) => {
                        warn!(title = %member.title, %error, "auto-subscribe failed");
                    }
                }
            }

            if changed {
                self.collection_repo
                    .replace_members(collection.collection_id, members)
                    .await
                    .map_err(CollectionError::Repository)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::RwLock as TokioRwLock;

    use crate::domain::entities::MediaMetadata;
    use crate::domain::value_objects::FilterNode;
    use crate::interfaces::external_services::{
        ImageKind, LibraryItem, MediaServerItem, PersonRef, ProviderIds, TmdbCollectionDetails, TmdbCollectionPart,
        TmdbTitleDetails,
    };
    use crate::shared::error::{RepositoryError, SubscribeError, TmdbError};

    struct InMemoryCollectionRepository {
        collections: TokioRwLock<HashMap<i64, CustomCollection>>,
        members: TokioRwLock<HashMap<i64, Vec<CollectionInfo>>>,
    }

    impl InMemoryCollectionRepository {
        fn new(collection: CustomCollection) -> Self {
            let mut collections = HashMap::new();
            collections.insert(collection.collection_id, collection);
            Self { collections: TokioRwLock::new(collections), members: TokioRwLock::new(HashMap::new()) }
        }

        fn seed_members(&mut self, collection_id: i64, members: Vec<CollectionInfo>) {
            self.members.get_mut().insert(collection_id, members);
        }
    }

    #[async_trait]
    impl CollectionRepository for InMemoryCollectionRepository {
        async fn save(&self, collection: &CustomCollection) -> Result<i64, RepositoryError> {
            self.collections.write().await.insert(collection.collection_id, collection.clone());
            Ok(collection.collection_id)
        }

        async fn find_by_id(&self, collection_id: i64) -> Result<Option<CustomCollection>, RepositoryError> {
            Ok(self.collections.read().await.get(&collection_id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<CustomCollection>, RepositoryError> {
            Ok(self.collections.read().await.values().cloned().collect())
        }

        async fn delete(&self, collection_id: i64) -> Result<(), RepositoryError> {
            self.collections.write().await.remove(&collection_id);
            Ok(())
        }

        async fn replace_members(&self, collection_id: i64, members: Vec<CollectionInfo>) -> Result<(), RepositoryError> {
            self.members.write().await.insert(collection_id, members);
            Ok(())
        }

        async fn find_members(&self, collection_id: i64) -> Result<Vec<CollectionInfo>, RepositoryError> {
            Ok(self.members.read().await.get(&collection_id).cloned().unwrap_or_default())
        }

        async fn find_missing_members(&self, collection_id: i64) -> Result<Vec<CollectionInfo>, RepositoryError> {
            Ok(self
                .members
                .read()
                .await
                .get(&collection_id)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .filter(|m| m.status == MemberStatus::Missing)
                .collect())
        }
    }

    struct StubMediaMetadataRepository {
        rows: Vec<MediaMetadata>,
    }

    #[async_trait]
    impl MediaMetadataRepository for StubMediaMetadataRepository {
        async fn upsert(&self, _metadata: MediaMetadata) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn find_by_tmdb_id(&self, tmdb_id: &str) -> Result<Option<MediaMetadata>, RepositoryError> {
            Ok(self.rows.iter().find(|m| m.tmdb_id == tmdb_id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<MediaMetadata>, RepositoryError> {
            Ok(self.rows.clone())
        }
    }

    struct StubMediaServer {
        created: Mutex<Vec<(String, Vec<String>)>>,
    }

    #[async_trait]
    impl MediaServerService for StubMediaServer {
        async fn get_item_details(&self, _item_id: &str) -> Result<MediaServerItem, ApplicationError> {
            unimplemented!()
        }

        async fn get_library_items(
            &self,
            _user_id: &str,
            _item_type: ItemType,
            _library_ids: &[String],
        ) -> Result<Vec<LibraryItem>, ApplicationError> {
            Ok(vec![])
        }

        async fn get_series_children(&self, _series_id: &str) -> Result<Vec<MediaServerItem>, ApplicationError> {
            Ok(vec![])
        }

        async fn update_person_details(&self, _person_id: &str, _name: Option<&str>) -> Result<(), ApplicationError> {
            Ok(())
        }

        async fn update_item_cast(&self, _item_id: &str, _cast: &[crate::domain::entities::CastMember]) -> Result<(), ApplicationError> {
            Ok(())
        }

        async fn refresh_item_metadata(&self, _item_id: &str, _replace_all: bool) -> Result<(), ApplicationError> {
            Ok(())
        }

        async fn download_image(&self, _item_id: &str, _kind: ImageKind, _dest_path: &str) -> Result<(), crate::shared::error::FilesystemError> {
            Ok(())
        }

        async fn create_or_update_collection(
            &self,
            name: &str,
            tmdb_ids: &[String],
            _item_type: ItemType,
        ) -> Result<(String, Vec<String>), ApplicationError> {
            self.created.lock().unwrap().push((name.to_string(), tmdb_ids.to_vec()));
            Ok(("coll-1".to_string(), tmdb_ids.to_vec()))
        }

        async fn append_item_to_collection(&self, _collection_id: &str, _item_id: &str) -> Result<(), ApplicationError> {
            Ok(())
        }

        async fn clear_all_persons(&self) -> Result<(), ApplicationError> {
            Ok(())
        }
    }

    struct StubTmdb {
        parts: Vec<TmdbCollectionPart>,
    }

    #[async_trait]
    impl TmdbTitleService for StubTmdb {
        async fn get_movie_details(&self, _tmdb_id: i64) -> Result<TmdbTitleDetails, TmdbError> {
            unimplemented!()
        }

        async fn get_tv_details(&self, _tmdb_id: i64) -> Result<TmdbTitleDetails, TmdbError> {
            unimplemented!()
        }

        async fn get_collection_details(&self, collection_id: i64) -> Result<TmdbCollectionDetails, TmdbError> {
            Ok(TmdbCollectionDetails { id: collection_id, name: "Stub Collection".to_string(), parts: self.parts.clone() })
        }
    }

    struct StubSubscribeAdapter {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SubscribeService for StubSubscribeAdapter {
        async fn subscribe(&self, tmdb_id: &str, _item_type: ItemType, _title: &str) -> Result<(), SubscribeError> {
            if tmdb_id == "reject-me" {
                return Err(SubscribeError::Rejected("no".to_string()));
            }
            self.calls.lock().unwrap().push(tmdb_id.to_string());
            Ok(())
        }
    }

    fn movie(tmdb_id: &str, in_library: bool) -> MediaMetadata {
        MediaMetadata {
            tmdb_id: tmdb_id.to_string(),
            item_type: ItemType::Movie,
            title: format!("Title {tmdb_id}"),
            release_year: Some(2020),
            release_date: Some("2020-01-01".to_string()),
            rating: Some(7.5),
            genres: vec!["Animation".to_string()],
            actors: vec![],
            directors: vec![],
            studios: vec![],
            countries: vec![],
            in_library,
        }
    }

    #[tokio::test]
    async fn refresh_list_classifies_members_and_preserves_subscribed_flag() {
        let collection = CustomCollection {
            collection_id: 1,
            name: "Ghibli".to_string(),
            definition: CollectionDefinition::List { provider: "tmdb_collection".to_string(), list_id: "10".to_string() },
            emby_collection_id: None,
            last_refreshed_at: None,
        };

        let mut collection_repo = InMemoryCollectionRepository::new(collection.clone());
        collection_repo.seed_members(
            1,
            vec![CollectionInfo { collection_id: 1, tmdb_id: "100".to_string(), title: "Old".to_string(), status: MemberStatus::Missing, subscribed: true }],
        );

        let metadata_repo = StubMediaMetadataRepository { rows: vec![movie("200", true)] };
        let media_server = StubMediaServer { created: Mutex::new(vec![]) };
        let tmdb = StubTmdb {
            parts: vec![
                TmdbCollectionPart { tmdb_id: 100, title: "Old".to_string(), release_date: Some("2019-01-01".to_string()) },
                TmdbCollectionPart { tmdb_id: 200, title: "In Library".to_string(), release_date: Some("2020-01-01".to_string()) },
                TmdbCollectionPart { tmdb_id: 300, title: "Unreleased".to_string(), release_date: Some("2099-01-01".to_string()) },
            ],
        };
        let subscribe_adapter = StubSubscribeAdapter { calls: Mutex::new(vec![]) };

        let engine = CollectionEngine::new(
            Arc::new(collection_repo),
            Arc::new(metadata_repo),
            Arc::new(media_server),
            Arc::new(tmdb),
            Arc::new(subscribe_adapter),
        );

        engine.refresh_all(None).await.unwrap();

        let members = engine.collection_repo.find_members(1).await.unwrap();
        let by_id: HashMap<&str, &CollectionInfo> = members.iter().map(|m| (m.tmdb_id.as_str(), m)).collect();
        assert_eq!(by_id["100"].status, MemberStatus::Missing);
        assert!(by_id["100"].subscribed, "subscribed flag must carry forward for a still-missing member");
        assert_eq!(by_id["200"].status, MemberStatus::InLibrary);
        assert_eq!(by_id["300"].status, MemberStatus::Unreleased);
    }

    #[tokio::test]
    async fn refresh_filter_matches_predicate_over_local_metadata() {
        let collection = CustomCollection {
            collection_id: 2,
            name: "Animation".to_string(),
            definition: CollectionDefinition::Filter { predicate: FilterNode::GenreIs("Animation".to_string()) },
            emby_collection_id: None,
            last_refreshed_at: None,
        };

        let collection_repo = InMemoryCollectionRepository::new(collection);
        let metadata_repo = StubMediaMetadataRepository { rows: vec![movie("1", true), movie("2", false)] };
        let media_server = StubMediaServer { created: Mutex::new(vec![]) };
        let tmdb = StubTmdb { parts: vec![] };
        let subscribe_adapter = StubSubscribeAdapter { calls: Mutex::new(vec![]) };

        let engine = CollectionEngine::new(
            Arc::new(collection_repo),
            Arc::new(metadata_repo),
            Arc::new(media_server),
            Arc::new(tmdb),
            Arc::new(subscribe_adapter),
        );

        engine.refresh_all(None).await.unwrap();

        let updated = engine.collection_repo.find_by_id(2).await.unwrap().unwrap();
        assert_eq!(updated.emby_collection_id.as_deref(), Some("coll-1"));
    }

    #[tokio::test]
    async fn auto_subscribe_flips_released_missing_members_to_subscribed() {
        let collection = CustomCollection {
            collection_id: 3,
            name: "Ghibli".to_string(),
            definition: CollectionDefinition::List { provider: "tmdb_collection".to_string(), list_id: "10".to_string() },
            emby_collection_id: None,
            last_refreshed_at: None,
        };

        let mut collection_repo = InMemoryCollectionRepository::new(collection);
        collection_repo.seed_members(
            3,
            vec![
                CollectionInfo { collection_id: 3, tmdb_id: "1".to_string(), title: "Released".to_string(), status: MemberStatus::Missing, subscribed: false },
                CollectionInfo { collection_id: 3, tmdb_id: "2".to_string(), title: "Unreleased".to_string(), status: MemberStatus::Missing, subscribed: false },
            ],
        );

        let metadata_repo = StubMediaMetadataRepository {
            rows: vec![
                MediaMetadata { release_date: Some("2020-01-01".to_string()), ..movie("1", false) },
                MediaMetadata { release_date: Some("2099-01-01".to_string()), ..movie("2", false) },
            ],
        };
        let media_server = StubMediaServer { created: Mutex::new(vec![]) };
        let tmdb = StubTmdb { parts: vec![] };
        let subscribe_adapter = StubSubscribeAdapter { calls: Mutex::new(vec![]) };

        let engine = CollectionEngine::new(
            Arc::new(collection_repo),
            Arc::new(metadata_repo),
            Arc::new(media_server),
            Arc::new(tmdb),
            Arc::new(subscribe_adapter),
        );

        engine.auto_subscribe(None).await.unwrap();

        let members = engine.collection_repo.find_members(3).await.unwrap();
        let by_id: HashMap<&str, &CollectionInfo> = members.iter().map(|m| (m.tmdb_id.as_str(), m)).collect();
        assert_eq!(by_id["1"].status, MemberStatus::Subscribed);
        assert!(by_id["1"].subscribed);
        assert_eq!(by_id["2"].status, MemberStatus::Missing, "unreleased member must not be subscribed");
    }
}
