//! Webhook ingress (C13) — the media server's only inbound surface.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::error;

use crate::domain::{ImageUpdatedEvent, ItemAddedEvent, ItemType};
use crate::presentation::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ItemAddedRequest {
    pub item_id: String,
    pub item_type: ItemType,
}

#[derive(Debug, Deserialize)]
pub struct ImageUpdatedRequest {
    pub item_id: String,
    pub item_type: ItemType,
    #[serde(default)]
    pub description_tag: Option<String>,
}

pub async fn item_added(
    State(state): State<AppState>,
    Json(body): Json<ItemAddedRequest>,
) -> StatusCode {
    let event = ItemAddedEvent::new(body.item_id, body.item_type);
    match state.webhook_router.handle_item_added(event).await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            error!(error = %err, "item-added webhook failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub async fn image_updated(
    State(state): State<AppState>,
    Json(body): Json<ImageUpdatedRequest>,
) -> StatusCode {
    let event = ImageUpdatedEvent::new(body.item_id, body.item_type, body.description_tag);
    match state.webhook_router.handle_image_updated(event).await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            error!(error = %err, "image-updated webhook failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
