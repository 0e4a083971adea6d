//! Shared state wired into the axum router by `main`.
//!
//! `AppState` is a plain struct of concrete `Arc` services — every handler
//! here needs the same small, fixed set, and axum's `FromRef` gives cheap
//! per-request cloning without a type-erased container in the way.

use std::sync::Arc;

use crate::application::services::{CastProcessor, CollectionEngine, IdentityEnricher};
use crate::application::services::webhook_router::WebhookRouter;
use crate::domain::repositories::{
    CollectionRepository, IdentityRepository, LogRepository, MediaMetadataRepository,
    SubscriptionRepository, WatchlistRepository,
};
use crate::infrastructure::filesystem::OverrideWriter;
use crate::infrastructure::jobs::TaskManager;
use crate::infrastructure::messaging::InMemoryEventBus;
use crate::interfaces::external_services::{MediaServerService, TmdbPersonService, TmdbTitleService};

/// Everything the ten task bodies (`task_handlers::run_task`) need that
/// isn't already reachable through `webhook_router`.
pub struct TaskServices {
    pub media_server: Arc<dyn MediaServerService>,
    pub tmdb_person: Arc<dyn TmdbPersonService>,
    pub tmdb_title: Arc<dyn TmdbTitleService>,
    pub identity_repo: Arc<dyn IdentityRepository>,
    pub log_repo: Arc<dyn LogRepository>,
    pub watchlist_repo: Arc<dyn WatchlistRepository>,
    pub subscription_repo: Arc<dyn SubscriptionRepository>,
    pub collection_repo: Arc<dyn CollectionRepository>,
    pub media_metadata_repo: Arc<dyn MediaMetadataRepository>,
    pub override_writer: Arc<OverrideWriter>,
    pub cast_processor: Arc<CastProcessor>,
    pub identity_enricher: Arc<IdentityEnricher>,
    pub collection_engine: Arc<CollectionEngine>,
}

#[derive(Clone)]
pub struct AppState {
    pub webhook_router: Arc<WebhookRouter>,
    pub task_manager: Arc<TaskManager>,
    pub services: Arc<TaskServices>,
    /// Publishes `TaskCompletedEvent` once a task body returns; shared with
    /// `webhook_router`'s own event traffic so both surfaces land on one bus.
    pub event_bus: Arc<InMemoryEventBus>,
    /// Shared secret checked by the auth middleware, when configured.
    pub webhook_token: Option<Arc<str>>,
}
