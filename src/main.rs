mod application;
mod domain;
mod infrastructure;
mod interfaces;
mod presentation;
mod shared;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::application::services::identity_enricher::IdentityEnricherConfig;
use crate::application::services::cast_processor::CastProcessorConfig;
use crate::application::{CastProcessor, CollectionEngine, IdentityEnricher, TranslationService, WebhookRouter};
use crate::infrastructure::database::{initialize_schema, ConnectionPool, ConnectionPoolConfig};
use crate::infrastructure::external::douban::DoubanClient;
use crate::infrastructure::external::media_server::MediaServerClient;
use crate::infrastructure::external::subscribe::MoviePilotClient;
use crate::infrastructure::external::tmdb::TmdbClient;
use crate::infrastructure::external::translators::{AiBatchTranslator, BaiduTranslateEngine, BingTranslateEngine, GoogleTranslateEngine};
use crate::infrastructure::filesystem::{FileOperationsAdapter, LocalCacheReader, OverrideWriter};
use crate::infrastructure::jobs::TaskManager;
use crate::infrastructure::messaging::InMemoryEventBus;
use crate::infrastructure::persistence::sqlite::{
    SqliteCollectionRepository, SqliteIdentityRepository, SqliteLogRepository, SqliteMediaMetadataRepository,
    SqliteSubscriptionRepository, SqliteTranslationRepository, SqliteWatchlistRepository,
};
use crate::interfaces::external_services::TranslatorEngine;
use crate::presentation::http::state::{AppState, TaskServices};

mod config;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");

    let config = Config::from_env()?;

    let pool_config = ConnectionPoolConfig::new(config.database_url.clone());
    let pool = ConnectionPool::create(pool_config).await.map_err(anyhow::Error::msg)?;
    initialize_schema(pool.inner()).await?;

    let identity_repo = Arc::new(SqliteIdentityRepository::new(pool.inner().clone()));
    let log_repo = Arc::new(SqliteLogRepository::new(pool.inner().clone()));
    let translation_repo = Arc::new(SqliteTranslationRepository::new(pool.inner().clone()));
    let watchlist_repo = Arc::new(SqliteWatchlistRepository::new(pool.inner().clone()));
    let subscription_repo = Arc::new(SqliteSubscriptionRepository::new(pool.inner().clone()));
    let media_metadata_repo = Arc::new(SqliteMediaMetadataRepository::new(pool.inner().clone()));
    let collection_repo = Arc::new(SqliteCollectionRepository::new(pool.inner().clone()));

    let media_server: Arc<MediaServerClient> =
        Arc::new(MediaServerClient::new(config.media_server_url.clone(), config.media_server_api_key.clone())?);
    let tmdb: Arc<TmdbClient> = Arc::new(TmdbClient::new(&config.tmdb_api_key)?);
    let douban: Arc<DoubanClient> =
        Arc::new(DoubanClient::new(config.douban_cookie.clone(), Duration::from_secs(config.douban_cooldown_secs))?);
    let subscribe_adapter: Arc<MoviePilotClient> =
        Arc::new(MoviePilotClient::new(&config.subscribe_base_url, &config.subscribe_api_key)?);

    let file_ops = Arc::new(FileOperationsAdapter::new());
    let cache_reader = Arc::new(LocalCacheReader::new(config.local_cache_root.clone(), file_ops.clone()));
    let override_writer = Arc::new(
        OverrideWriter::new(config.override_root.clone(), cache_reader.clone(), file_ops.clone())
            .with_inter_call_delay(Duration::from_millis(config.override_mirror_delay_ms)),
    );

    let fallback_engines: Vec<Arc<dyn TranslatorEngine>> = config
        .translation_engine_order
        .iter()
        .filter_map(|name| match name.as_str() {
            "bing" => Some(Arc::new(BingTranslateEngine::new()) as Arc<dyn TranslatorEngine>),
            "google" => Some(Arc::new(GoogleTranslateEngine::new()) as Arc<dyn TranslatorEngine>),
            "baidu" => config
                .baidu_app_id
                .clone()
                .zip(config.baidu_app_secret.clone())
                .map(|(id, secret)| Arc::new(BaiduTranslateEngine::new(id, secret)) as Arc<dyn TranslatorEngine>),
            other => {
                tracing::warn!(engine = other, "unknown translation engine in TRANSLATION_ENGINE_ORDER, skipping");
                None
            }
        })
        .collect();
    let ai_engine: Arc<dyn TranslatorEngine> =
        Arc::new(AiBatchTranslator::new(&config.ai_translator_base_url, &config.ai_translator_model));
    let translation_service = Arc::new(TranslationService::new(translation_repo, ai_engine, fallback_engines));

    let cast_processor = Arc::new(CastProcessor::new(
        identity_repo.clone(),
        log_repo.clone(),
        douban.clone(),
        media_server.clone(),
        cache_reader.clone(),
        translation_service.clone(),
        CastProcessorConfig {
            max_actors: config.max_actors,
            role_prefix_enabled: config.role_prefix_enabled,
            min_score_for_review: config.min_score_for_review,
            pretranslate_native_names: config.pretranslate_native_names,
        },
    ));

    let identity_enricher = Arc::new(IdentityEnricher::new(
        identity_repo.clone(),
        tmdb.clone(),
        douban.clone(),
        IdentityEnricherConfig {
            max_duration: Duration::from_secs(config.enricher_wall_clock_secs),
            ..IdentityEnricherConfig::default()
        },
    ));

    let collection_engine = Arc::new(CollectionEngine::new(
        collection_repo.clone(),
        media_metadata_repo.clone(),
        media_server.clone(),
        tmdb.clone(),
        subscribe_adapter.clone(),
    ));

    let event_bus = Arc::new(InMemoryEventBus::new());
    let webhook_router = Arc::new(WebhookRouter::new(
        media_server.clone(),
        cast_processor.clone(),
        override_writer.clone(),
        watchlist_repo.clone(),
        media_metadata_repo.clone(),
        collection_repo.clone(),
        event_bus.clone(),
    ));

    let task_manager = Arc::new(TaskManager::new());
    let services = Arc::new(TaskServices {
        media_server,
        tmdb_person: tmdb.clone(),
        tmdb_title: tmdb,
        identity_repo,
        log_repo,
        watchlist_repo,
        subscription_repo,
        collection_repo,
        media_metadata_repo,
        override_writer,
        cast_processor,
        identity_enricher,
        collection_engine,
    });

    let state = AppState {
        webhook_router,
        task_manager,
        services,
        event_bus,
        webhook_token: config.webhook_token.map(Arc::from),
    };

    let router = presentation::http::build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    info!(addr, "starting castlinkd");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
