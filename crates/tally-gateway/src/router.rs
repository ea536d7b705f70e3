//! Axum router wiring.
//!
//! - `/healthz`         : liveness
//! - `/metrics`         : Prometheus text format
//! - `/metrics/health`  : JSON snapshot (samples memory first)
//! - `/metrics/summary` : JSON derived aggregates
//! - `/metrics/events`  : newest raw events

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, ops, track};

pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .route("/metrics/health", get(ops::metrics_health))
        .route("/metrics/summary", get(ops::metrics_summary))
        .route("/metrics/events", get(ops::metrics_events));

    if state.cfg().metrics.track_requests {
        router = router.route_layer(middleware::from_fn_with_state(
            state.clone(),
            track::track_requests,
        ));
    }

    router.with_state(state)
}
