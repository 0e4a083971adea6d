//! Task control surface (C12) — submit by key, poll status, cancel.
//!
//! Each task key is wired here to the application services it needs; the
//! bodies mirror what the webhook router does for a single item, applied
//! across a whole library or across every saved subscription/collection.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::domain::entities::{CastMember, MediaMetadata, UpsertCandidate, WatchlistEntry};
use crate::domain::events::TaskCompletedEvent;
use crate::domain::value_objects::{ItemType, TaskKey};
use crate::infrastructure::filesystem::OverrideWriter;
use crate::infrastructure::jobs::TaskHandle;
use crate::infrastructure::messaging::InMemoryEventBus;
use crate::interfaces::external_services::{MediaServerItem, MediaServerService};
use crate::interfaces::messaging::EventBus;
use crate::presentation::http::state::{AppState, TaskServices};

pub async fn submit_task(State(state): State<AppState>, Path(key): Path<String>) -> (StatusCode, Json<Value>) {
    let Some(task_key) = TaskKey::parse(&key) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": format!("unknown task key: {key}") })));
    };

    let accepted = spawn_task(state.task_manager.clone(), state.services.clone(), state.event_bus.clone(), task_key).await;
    if accepted {
        (StatusCode::ACCEPTED, Json(json!({ "key": task_key.as_str(), "status": "started" })))
    } else {
        (StatusCode::CONFLICT, Json(json!({ "error": "a task is already running" })))
    }
}

#[derive(Serialize)]
struct TaskStatusResponse {
    key: String,
    display_name: String,
    progress: i32,
    message: String,
    running: bool,
    recent_log_lines: Vec<String>,
}

pub async fn get_status(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.task_manager.status().await {
        Some(status) => (
            StatusCode::OK,
            Json(json!(TaskStatusResponse {
                key: status.key.as_str().to_string(),
                display_name: status.key.display_name().to_string(),
                progress: status.progress,
                message: status.message,
                running: status.running,
                recent_log_lines: status.recent_log_lines.into_iter().collect(),
            })),
        ),
        None => (StatusCode::OK, Json(json!({ "running": false }))),
    }
}

pub async fn cancel_task(State(state): State<AppState>) -> StatusCode {
    if state.task_manager.cancel().await {
        StatusCode::ACCEPTED
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn spawn_task(
    task_manager: Arc<crate::infrastructure::jobs::TaskManager>,
    services: Arc<TaskServices>,
    event_bus: Arc<InMemoryEventBus>,
    key: TaskKey,
) -> bool {
    task_manager
        .submit(key, move |handle| async move {
            let result = run_task(key, services, handle).await;
            let event = TaskCompletedEvent::new(
                key,
                result.is_ok(),
                result.clone().err().unwrap_or_else(|| "ok".to_string()),
            );
            if let Err(err) = event_bus.publish(event).await {
                warn!(error = %err, task = key.as_str(), "failed to publish task-completed event");
            }
            result
        })
        .await
}

async fn run_task(key: TaskKey, services: Arc<TaskServices>, handle: TaskHandle) -> Result<(), String> {
    match key {
        TaskKey::FullScan => full_scan(&services, &handle).await,
        TaskKey::PopulateMetadata => populate_metadata(&services, &handle).await,
        TaskKey::SyncPersonMap => sync_person_map(&services, &handle).await,
        TaskKey::ProcessWatchlist => process_watchlist(&services, &handle).await,
        TaskKey::EnrichAliases => enrich_aliases(&services, &handle).await,
        TaskKey::ActorCleanup => actor_cleanup(&services, &handle).await,
        TaskKey::RefreshCollections | TaskKey::CustomCollections => {
            services.collection_engine.refresh_all(Some(&handle)).await.map_err(|e| e.to_string())
        }
        TaskKey::AutoSubscribe => services.collection_engine.auto_subscribe(Some(&handle)).await.map_err(|e| e.to_string()),
        TaskKey::ActorTracking => actor_tracking(&services, &handle).await,
    }
}

/// Writes the processed cast to the override cache and pushes it to the
/// media server, the same two steps the webhook router takes for a single
/// item (spec.md §4.4, §4.7).
async fn persist_cast(
    override_writer: &OverrideWriter,
    media_server: &dyn MediaServerService,
    item: &MediaServerItem,
    tmdb_id: &str,
    cast: &[CastMember],
) -> Result<(), String> {
    match item.item_type {
        ItemType::Movie => override_writer.write_movie_cast(tmdb_id, cast).await.map_err(|e| e.to_string())?,
        ItemType::Series => override_writer.write_series_cast(tmdb_id, cast, true).await.map_err(|e| e.to_string())?,
        ItemType::Episode | ItemType::Season => {
            override_writer.write_series_cast(tmdb_id, cast, false).await.map_err(|e| e.to_string())?
        }
    }
    media_server.update_item_cast(&item.id, cast).await.map_err(|e| e.to_string())
}

async fn full_scan(services: &TaskServices, handle: &TaskHandle) -> Result<(), String> {
    for item_type in [ItemType::Movie, ItemType::Series] {
        let library_items = services
            .media_server
            .get_library_items("", item_type, &[])
            .await
            .map_err(|e| e.to_string())?;

        for (index, library_item) in library_items.iter().enumerate() {
            if handle.is_cancelled() {
                return Err("cancelled".to_string());
            }
            handle
                .set_progress(((index * 100) / library_items.len().max(1)) as i32, format!("scanning {}", library_item.name))
                .await;

            let item = match services.media_server.get_item_details(&library_item.id).await {
                Ok(item) => item,
                Err(err) => {
                    handle.log(format!("failed to fetch {}: {err}", library_item.name)).await;
                    continue;
                }
            };

            let Some(tmdb_id) = item.provider_ids.tmdb.clone() else {
                let _ = services.cast_processor.log_failure(&item.id, &item.name, "item has no tmdb id").await;
                continue;
            };

            match services.cast_processor.process_item(&item).await {
                Ok(processed) => {
                    if let Err(err) =
                        persist_cast(&services.override_writer, services.media_server.as_ref(), &item, &tmdb_id, &processed.cast).await
                    {
                        handle.log(format!("failed to persist cast for {}: {err}", item.name)).await;
                    }
                }
                Err(err) => {
                    let _ = services.cast_processor.log_failure(&item.id, &item.name, err.to_string()).await;
                }
            }
        }
    }
    Ok(())
}

async fn populate_metadata(services: &TaskServices, handle: &TaskHandle) -> Result<(), String> {
    for item_type in [ItemType::Movie, ItemType::Series] {
        let library_items = services
            .media_server
            .get_library_items("", item_type, &[])
            .await
            .map_err(|e| e.to_string())?;

        for (index, library_item) in library_items.iter().enumerate() {
            if handle.is_cancelled() {
                return Err("cancelled".to_string());
            }
            handle
                .set_progress(((index * 100) / library_items.len().max(1)) as i32, format!("populating {}", library_item.name))
                .await;

            let Some(tmdb_id_str) = &library_item.provider_ids.tmdb else {
                continue;
            };
            let Ok(tmdb_id) = tmdb_id_str.parse::<i64>() else {
                continue;
            };

            let details = match item_type {
                ItemType::Movie => services.tmdb_title.get_movie_details(tmdb_id).await,
                _ => services.tmdb_title.get_tv_details(tmdb_id).await,
            };
            let details = match details {
                Ok(details) => details,
                Err(err) => {
                    handle.log(format!("tmdb lookup failed for {}: {err}", library_item.name)).await;
                    continue;
                }
            };

            let release_year = details.release_date.as_deref().and_then(|d| d.get(0..4)).and_then(|y| y.parse().ok());
            let metadata = MediaMetadata {
                tmdb_id: tmdb_id_str.clone(),
                item_type,
                title: details.title,
                release_year,
                release_date: details.release_date,
                rating: Some(details.vote_average),
                genres: details.genres,
                actors: details.cast.into_iter().take(10).map(|c| c.name).collect(),
                directors: details.directors,
                studios: details.studios,
                countries: details.countries,
                in_library: true,
            };
            services.media_metadata_repo.upsert(metadata).await.map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}

async fn sync_person_map(services: &TaskServices, handle: &TaskHandle) -> Result<(), String> {
    for item_type in [ItemType::Movie, ItemType::Series] {
        let library_items = services
            .media_server
            .get_library_items("", item_type, &[])
            .await
            .map_err(|e| e.to_string())?;

        for (index, library_item) in library_items.iter().enumerate() {
            if handle.is_cancelled() {
                return Err("cancelled".to_string());
            }
            handle
                .set_progress(((index * 100) / library_items.len().max(1)) as i32, format!("syncing {}", library_item.name))
                .await;

            let item = match services.media_server.get_item_details(&library_item.id).await {
                Ok(item) => item,
                Err(err) => {
                    handle.log(format!("failed to fetch {}: {err}", library_item.name)).await;
                    continue;
                }
            };

            for person in &item.people {
                if person.id.is_empty() || person.name.trim().is_empty() {
                    continue;
                }
                let candidate = UpsertCandidate {
                    name: Some(person.name.clone()),
                    tmdb_person_id: person.provider_ids.tmdb.clone(),
                    emby_person_id: Some(person.id.clone()),
                    imdb_id: person.provider_ids.imdb.clone(),
                    douban_celebrity_id: person.provider_ids.douban.clone(),
                };
                if let Err(err) = services.identity_repo.upsert(candidate).await {
                    warn!(error = %err, person = %person.name, "identity sync failed");
                }
            }
        }
    }
    Ok(())
}

async fn process_watchlist(services: &TaskServices, handle: &TaskHandle) -> Result<(), String> {
    let entries = services.watchlist_repo.find_unresolved().await.map_err(|e| e.to_string())?;
    for (index, entry) in entries.iter().enumerate() {
        if handle.is_cancelled() {
            return Err("cancelled".to_string());
        }
        handle
            .set_progress(((index * 100) / entries.len().max(1)) as i32, format!("checking {}", entry.title))
            .await;

        let in_library = services
            .media_metadata_repo
            .find_by_tmdb_id(&entry.tmdb_id)
            .await
            .map_err(|e| e.to_string())?
            .is_some_and(|m| m.in_library);

        if in_library {
            services.watchlist_repo.mark_resolved(&entry.tmdb_id).await.map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}

async fn enrich_aliases(services: &TaskServices, handle: &TaskHandle) -> Result<(), String> {
    let summary = services.identity_enricher.run(Some(handle)).await.map_err(|e| e.to_string())?;
    handle
        .log(format!(
            "phase a: {} found / {} not found / {} failed; phase b: {} found / {} not found / {} failed",
            summary.phase_a_found,
            summary.phase_a_not_found,
            summary.phase_a_failed,
            summary.phase_b_found,
            summary.phase_b_not_found,
            summary.phase_b_failed,
        ))
        .await;
    Ok(())
}

/// Retries the most recent processing failures now that upstream data may
/// have changed (a transient Douban outage, a since-fixed provider id).
async fn actor_cleanup(services: &TaskServices, handle: &TaskHandle) -> Result<(), String> {
    let failures = services.log_repo.find_recent_failures(50).await.map_err(|e| e.to_string())?;
    for (index, failure) in failures.iter().enumerate() {
        if handle.is_cancelled() {
            return Err("cancelled".to_string());
        }
        handle
            .set_progress(((index * 100) / failures.len().max(1)) as i32, format!("retrying {}", failure.item_name))
            .await;

        let item = match services.media_server.get_item_details(&failure.item_id).await {
            Ok(item) => item,
            Err(err) => {
                handle.log(format!("{} still unreachable: {err}", failure.item_name)).await;
                continue;
            }
        };
        let Some(tmdb_id) = item.provider_ids.tmdb.clone() else {
            continue;
        };

        match services.cast_processor.process_item(&item).await {
            Ok(processed) => {
                if let Err(err) =
                    persist_cast(&services.override_writer, services.media_server.as_ref(), &item, &tmdb_id, &processed.cast).await
                {
                    handle.log(format!("retry persist failed for {}: {err}", item.name)).await;
                } else {
                    handle.log(format!("{} recovered", item.name)).await;
                }
            }
            Err(err) => {
                handle.log(format!("{} still failing: {err}", item.name)).await;
            }
        }
    }
    Ok(())
}

async fn actor_tracking(services: &TaskServices, handle: &TaskHandle) -> Result<(), String> {
    let subscriptions = services.subscription_repo.find_all().await.map_err(|e| e.to_string())?;
    for (index, subscription) in subscriptions.iter().enumerate() {
        if handle.is_cancelled() {
            return Err("cancelled".to_string());
        }
        handle
            .set_progress(((index * 100) / subscriptions.len().max(1)) as i32, format!("checking {}", subscription.display_name))
            .await;

        let Some(identity) = services.identity_repo.find_by_id(subscription.person_map_id).await.map_err(|e| e.to_string())? else {
            continue;
        };
        let Some(tmdb_person_id) = identity.tmdb_person_id.as_deref().and_then(|id| id.parse::<i64>().ok()) else {
            continue;
        };

        let credits = match services.tmdb_person.get_person_credits(tmdb_person_id).await {
            Ok(credits) => credits,
            Err(err) => {
                handle.log(format!("credits lookup failed for {}: {err}", subscription.display_name)).await;
                continue;
            }
        };

        let mut known: Vec<String> = subscription.known_credit_tmdb_ids.clone();
        for credit in &credits {
            let credit_id = credit.tmdb_id.to_string();
            if known.contains(&credit_id) {
                continue;
            }
            known.push(credit_id.clone());
            services
                .watchlist_repo
                .add(WatchlistEntry {
                    tmdb_id: credit_id,
                    item_type: credit.item_type,
                    title: credit.title.clone(),
                    added_at: Utc::now(),
                    resolved: false,
                })
                .await
                .map_err(|e| e.to_string())?;
        }

        if known.len() != subscription.known_credit_tmdb_ids.len() {
            services
                .subscription_repo
                .update_known_credits(subscription.person_map_id, known)
                .await
                .map_err(|e| e.to_string())?;
        }
    }
    Ok(())
}
