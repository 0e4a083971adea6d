//! Webhook authentication middleware.
//!
//! The media server calls back over the local network with no built-in
//! auth of its own, so the shared secret (`WEBHOOK_TOKEN`) is just a header
//! the caller must echo back. When unset, every request passes — the
//! deployment is trusted to keep the port off the public internet.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::presentation::http::state::AppState;

pub async fn auth_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    if req.uri().path() == "/health" {
        return Ok(next.run(req).await);
    }

    let Some(expected) = &state.webhook_token else {
        return Ok(next.run(req).await);
    };

    let provided = req.headers().get("x-webhook-token").and_then(|v| v.to_str().ok());
    if provided != Some(expected.as_ref()) {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(req).await)
}
