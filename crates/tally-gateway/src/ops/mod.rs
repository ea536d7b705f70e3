//! Operational HTTP endpoints.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use tally_core::export;

use crate::app_state::AppState;

const DEFAULT_EVENTS_LIMIT: usize = 100;

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = export::render(&state.store());

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, export::CONTENT_TYPE)],
        body,
    )
        .into_response()
}

pub async fn metrics_health(State(state): State<AppState>) -> Response {
    Json(export::sampled_health_snapshot(&state.store(), state.sampler())).into_response()
}

pub async fn metrics_summary(State(state): State<AppState>) -> Response {
    Json(export::summary(&state.store(), state.sampler())).into_response()
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub limit: Option<usize>,
}

pub async fn metrics_events(
    State(state): State<AppState>,
    Query(q): Query<EventsQuery>,
) -> Response {
    let store = state.store();
    let limit = q
        .limit
        .unwrap_or(DEFAULT_EVENTS_LIMIT)
        .min(store.event_capacity());
    Json(store.recent_events(limit)).into_response()
}
