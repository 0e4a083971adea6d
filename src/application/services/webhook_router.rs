//! Webhook router (C13): translates single-item media-server events into
//! the cast-processing and collection-matching work described in
//! spec.md §4.7.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::services::cast_processor::CastProcessor;
use crate::domain::{CastProcessedEvent, CollectionDefinition, ImageUpdatedEvent, ItemAddedEvent, ItemType, WatchlistEntry};
use crate::domain::repositories::{CollectionRepository, MediaMetadataRepository, WatchlistRepository};
use crate::domain::services::matches_filter;
use crate::infrastructure::filesystem::OverrideWriter;
use crate::infrastructure::messaging::InMemoryEventBus;
use crate::interfaces::external_services::MediaServerService;
use crate::interfaces::messaging::EventBus;
use crate::shared::error::ApplicationError;

pub struct WebhookRouter {
    media_server: Arc<dyn MediaServerService>,
    cast_processor: Arc<CastProcessor>,
    override_writer: Arc<OverrideWriter>,
    watchlist_repo: Arc<dyn WatchlistRepository>,
    media_metadata_repo: Arc<dyn MediaMetadataRepository>,
    collection_repo: Arc<dyn CollectionRepository>,
    event_bus: Arc<InMemoryEventBus>,
}

impl WebhookRouter {
    pub fn new(
        media_server: Arc<dyn MediaServerService>,
        cast_processor: Arc<CastProcessor>,
        override_writer: Arc<OverrideWriter>,
        watchlist_repo: Arc<dyn WatchlistRepository>,
        media_metadata_repo: Arc<dyn MediaMetadataRepository>,
        collection_repo: Arc<dyn CollectionRepository>,
        event_bus: Arc<InMemoryEventBus>,
    ) -> Self {
        Self {
            media_server,
            cast_processor,
            override_writer,
            watchlist_repo,
            media_metadata_repo,
            collection_repo,
            event_bus,
        }
    }

    pub async fn handle_item_added(&self, event: ItemAddedEvent) -> Result<(), ApplicationError> {
        let item = self.media_server.get_item_details(&event.item_id).await?;

        if item.item_type == ItemType::Series {
            self.watchlist_repo
                .add(WatchlistEntry {
                    tmdb_id: item.provider_ids.tmdb.clone().unwrap_or_default(),
                    item_type: item.item_type,
                    title: item.name.clone(),
                    added_at: event.timestamp,
                    resolved: false,
                })
                .await?;
        }

        let Some(tmdb_id) = item.provider_ids.tmdb.clone() else {
            self.cast_processor.log_failure(&item.id, &item.name, "item has no tmdb id").await?;
            return Ok(());
        };

        let processed = self.cast_processor.process_item(&item).await?;
        let final_cast = &processed.cast;

        match item.item_type {
            ItemType::Movie => self.override_writer.write_movie_cast(&tmdb_id, final_cast).await?,
            ItemType::Series => self.override_writer.write_series_cast(&tmdb_id, final_cast, true).await?,
            ItemType::Episode | ItemType::Season => {
                self.override_writer.write_series_cast(&tmdb_id, final_cast, false).await?
            }
        }

        self.media_server.update_item_cast(&item.id, final_cast).await?;

        self.append_to_matching_filter_collections(&tmdb_id, &item.id).await?;

        let _ = self
            .event_bus
            .publish(CastProcessedEvent::new(item.id.clone(), processed.quality_score, processed.needs_review))
            .await;

        Ok(())
    }

    async fn append_to_matching_filter_collections(&self, tmdb_id: &str, item_id: &str) -> Result<(), ApplicationError> {
        let Some(metadata) = self.media_metadata_repo.find_by_tmdb_id(tmdb_id).await? else {
            debug!(tmdb_id, "no local metadata snapshot yet, skipping filter-collection match");
            return Ok(());
        };

        for collection in self.collection_repo.find_all().await? {
            let CollectionDefinition::Filter { predicate } = &collection.definition else {
                continue;
            };
            if !matches_filter(predicate, &metadata) {
                continue;
            }
            let Some(emby_collection_id) = &collection.emby_collection_id else {
                continue;
            };
            if let Err(err) = self.media_server.append_item_to_collection(emby_collection_id, item_id).await {
                warn!(collection = %collection.name, error = %err, "failed to append item to matching collection");
            }
        }
        Ok(())
    }

    pub async fn handle_image_updated(&self, event: ImageUpdatedEvent) -> Result<(), ApplicationError> {
        let item = self.media_server.get_item_details(&event.item_id).await?;
        let Some(tmdb_id) = item.provider_ids.tmdb.clone() else {
            debug!(item_id = %event.item_id, "image-updated event for item with no tmdb id, skipping");
            return Ok(());
        };

        self.override_writer
            .sync_images(self.media_server.as_ref(), item.item_type, &tmdb_id, &item.id, &[])
            .await?;
        Ok(())
    }
}
