pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use state::AppState;

/// Builds the full router: webhook ingress, task control, and a health
/// check, with auth/CORS/logging applied in the teacher's layering order.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/webhooks/item-added", post(handlers::webhook_handlers::item_added))
        .route("/webhooks/image-updated", post(handlers::webhook_handlers::image_updated))
        .route("/tasks/:key", post(handlers::task_handlers::submit_task))
        .route("/tasks/status", get(handlers::task_handlers::get_status))
        .route("/tasks/cancel", post(handlers::task_handlers::cancel_task))
        .route("/health", get(handlers::health_handlers::health))
        .layer(from_fn_with_state(state.clone(), middleware::auth_middleware))
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(middleware::cors_layer())
        .with_state(state)
}
