//! Business-level recording facade.
//!
//! Each method is a fixed composition of store calls with a canonical label
//! schema per family. All of them are fire-and-forget.

use std::sync::Arc;

use crate::store::MetricStore;

pub const API_REQUESTS_TOTAL: &str = "api_requests_total";
pub const API_REQUEST_DURATION_SECONDS: &str = "api_request_duration_seconds";
pub const API_ERRORS_TOTAL: &str = "api_errors_total";
pub const USER_ACTIONS_TOTAL: &str = "user_actions_total";
pub const DATABASE_OPERATIONS_TOTAL: &str = "database_operations_total";
pub const DATABASE_OPERATION_DURATION_SECONDS: &str = "database_operation_duration_seconds";
pub const FILE_OPERATIONS_TOTAL: &str = "file_operations_total";
pub const FILE_SIZE_BYTES: &str = "file_size_bytes";
pub const AUTH_EVENTS_TOTAL: &str = "auth_events_total";
pub const CACHE_HIT_RATE: &str = "cache_hit_rate";
pub const CACHE_OPERATIONS_TOTAL: &str = "cache_operations_total";

#[derive(Clone)]
pub struct Recorder {
    store: Arc<MetricStore>,
}

impl Recorder {
    /// Wrap the shared store.
    pub fn new(store: Arc<MetricStore>) -> Self {
        Self { store }
    }

    /// The store this recorder writes into.
    pub fn store(&self) -> &MetricStore {
        &self.store
    }

    /// One HTTP request. Status codes >= 400 also count as errors.
    pub fn record_api_call(&self, endpoint: &str, method: &str, status_code: u16, duration_ms: f64) {
        let status = status_code.to_string();
        let labels = [
            ("endpoint", endpoint),
            ("method", method),
            ("status_code", status.as_str()),
        ];
        self.store.increment_counter(API_REQUESTS_TOTAL, &labels, 1.0);
        self.store
            .record_histogram(API_REQUEST_DURATION_SECONDS, duration_ms / 1000.0, &labels);
        if status_code >= 400 {
            self.store.increment_counter(API_ERRORS_TOTAL, &labels, 1.0);
        }
    }

    /// One user action, labeled by action and user id.
    pub fn record_user_action(&self, action: &str, user_id: &str) {
        self.store.increment_counter(
            USER_ACTIONS_TOTAL,
            &[("action", action), ("user_id", user_id)],
            1.0,
        );
    }

    /// One query; duration is converted from milliseconds to seconds.
    pub fn record_database_operation(&self, operation: &str, table: &str, duration_ms: f64) {
        let labels = [("operation", operation), ("table", table)];
        self.store.increment_counter(DATABASE_OPERATIONS_TOTAL, &labels, 1.0);
        self.store.record_histogram(
            DATABASE_OPERATION_DURATION_SECONDS,
            duration_ms / 1000.0,
            &labels,
        );
    }

    /// Sizes share the latency bucket bounds, so every realistic file size
    /// only reaches the `+Inf` bucket.
    pub fn record_file_operation(&self, operation: &str, file_type: &str, size_bytes: Option<u64>) {
        let labels = [("operation", operation), ("file_type", file_type)];
        self.store.increment_counter(FILE_OPERATIONS_TOTAL, &labels, 1.0);
        if let Some(size) = size_bytes {
            self.store.record_histogram(FILE_SIZE_BYTES, size as f64, &labels);
        }
    }

    /// One auth event with `success="true"|"false"`.
    pub fn record_auth_event(&self, event: &str, success: bool) {
        let success = if success { "true" } else { "false" };
        self.store.increment_counter(
            AUTH_EVENTS_TOTAL,
            &[("event", event), ("success", success)],
            1.0,
        );
    }

    /// Sets the hit-rate gauge and counts hits and misses. A non-positive
    /// `total` yields a rate of 0; `total - hits` is not checked for sign.
    pub fn record_cache_hit_rate(&self, service: &str, hits: f64, total: f64) {
        let rate = if total > 0.0 { hits / total } else { 0.0 };
        self.store.set_gauge(CACHE_HIT_RATE, rate, &[("service", service)]);
        self.store.increment_counter(
            CACHE_OPERATIONS_TOTAL,
            &[("service", service), ("type", "hit")],
            hits,
        );
        self.store.increment_counter(
            CACHE_OPERATIONS_TOTAL,
            &[("service", service), ("type", "miss")],
            total - hits,
        );
    }
}
