//! Request-tracking middleware.
//!
//! Installed as a route layer so the matched route template (not the raw
//! path) becomes the `endpoint` label and unknown paths are not recorded.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().to_string();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());

    let started = Instant::now();
    let res = next.run(req).await;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let status = res.status().as_u16();
    state
        .recorder()
        .record_api_call(&endpoint, &method, status, elapsed_ms);
    tracing::debug!(%endpoint, %method, status, elapsed_ms, "request recorded");

    res
}
