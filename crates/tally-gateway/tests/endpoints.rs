//! HTTP surface driven through the router.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::util::ServiceExt;

use tally_gateway::app_state::AppState;
use tally_gateway::{config, router};

fn state(track_requests: bool) -> AppState {
    let cfg = config::load_from_str(&format!(
        "version: 1\nmetrics:\n  track_requests: {track_requests}\n"
    ))
    .unwrap();
    AppState::new(cfg)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn metrics_endpoint_serves_exposition_text() {
    let state = state(false);
    state.recorder().record_api_call("/api/users", "GET", 200, 150.0);
    let app = router::build_router(state);

    let (status, content_type, body) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        content_type.as_deref(),
        Some("text/plain; version=0.0.4; charset=utf-8")
    );
    assert!(body.lines().any(|l| l == "# TYPE api_requests_total counter"));
    assert!(body.lines().any(|l| {
        l == r#"api_requests_total{endpoint="/api/users",method="GET",status_code="200"} 1"#
    }));
}

#[tokio::test]
async fn health_endpoint_samples_memory() {
    let state = state(false);
    let store = state.store();
    let app = router::build_router(state);

    let (status, _, body) = get(&app, "/metrics/health").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    for key in ["counters", "histograms", "gauges", "system"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert!(json["gauges"]
        .get(r#"memory_usage_bytes|type="rss""#)
        .is_some());
    assert_eq!(store.gauges().len(), 4);
}

#[tokio::test]
async fn summary_endpoint_reports_error_rate() {
    let state = state(false);
    state.recorder().record_api_call("/a", "GET", 200, 10.0);
    state.recorder().record_api_call("/a", "GET", 503, 10.0);
    let app = router::build_router(state);

    let (status, _, body) = get(&app, "/metrics/summary").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["api"]["totalRequests"], 2.0);
    assert_eq!(json["api"]["errorRate"], 50.0);
    for key in ["api", "auth", "database", "files", "system"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
}

#[tokio::test]
async fn events_endpoint_honours_limit() {
    let state = state(false);
    for i in 0..5 {
        state.store().set_gauge("g", i as f64, &[]);
    }
    let app = router::build_router(state);

    let (_, _, body) = get(&app, "/metrics/events?limit=2").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    let values: Vec<f64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["value"].as_f64().unwrap())
        .collect();
    assert_eq!(values, [3.0, 4.0]);
}

#[tokio::test]
async fn tracking_records_matched_routes() {
    let state = state(true);
    let store = state.store();
    let app = router::build_router(state);

    let (status, _, _) = get(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = get(&app, "/does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let labels = [("endpoint", "/healthz"), ("method", "GET"), ("status_code", "200")];
    assert_eq!(store.get_counter("api_requests_total", &labels), 1.0);
    assert_eq!(
        store
            .get_histogram("api_request_duration_seconds", &labels)
            .unwrap()
            .count,
        1
    );
    assert_eq!(
        store.counter_family_total("api_requests_total", |_| true),
        1.0
    );
}

#[tokio::test]
async fn tracking_disabled_records_nothing() {
    let state = state(false);
    let store = state.store();
    let app = router::build_router(state);

    get(&app, "/healthz").await;
    assert!(store.counters().is_empty());
}
