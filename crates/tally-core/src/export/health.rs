//! JSON health snapshot and derived summary.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::labels::Labels;
use crate::recorder::{
    API_ERRORS_TOTAL, API_REQUESTS_TOTAL, API_REQUEST_DURATION_SECONDS, AUTH_EVENTS_TOTAL,
    DATABASE_OPERATIONS_TOTAL, DATABASE_OPERATION_DURATION_SECONDS, FILE_OPERATIONS_TOTAL,
    FILE_SIZE_BYTES,
};
use crate::store::{Counter, Gauge, MetricStore};
use crate::system::{MemoryUsage, SystemSampler, SystemSnapshot};

#[derive(Debug, Serialize)]
pub struct HealthSnapshot {
    pub counters: BTreeMap<String, Counter>,
    pub histograms: BTreeMap<String, HistogramView>,
    pub gauges: BTreeMap<String, Gauge>,
    pub system: SystemSnapshot,
}

#[derive(Debug, Serialize)]
pub struct HistogramView {
    pub name: String,
    pub labels: Labels,
    pub count: u64,
    pub sum: f64,
    pub average: f64,
    pub buckets: Vec<BucketView>,
}

#[derive(Debug, Serialize)]
pub struct BucketView {
    pub le: String,
    pub count: u64,
}

/// Full store contents plus a fresh system reading. Does not sample memory
/// gauges itself; see `sampled_health_snapshot`.
pub fn health_snapshot(store: &MetricStore, sampler: &SystemSampler) -> HealthSnapshot {
    snapshot_of(store, sampler.snapshot())
}

/// Sample memory into the `memory_usage_bytes` gauges, then snapshot. The
/// gauges and `system.memoryUsage` come from the same reading.
pub fn sampled_health_snapshot(store: &MetricStore, sampler: &SystemSampler) -> HealthSnapshot {
    let mem = sampler.record_memory_usage(store);
    snapshot_of(store, sampler.snapshot_with(mem))
}

fn snapshot_of(store: &MetricStore, system: SystemSnapshot) -> HealthSnapshot {
    let histograms = store
        .histograms()
        .into_iter()
        .map(|(key, h)| {
            let view = HistogramView {
                average: h.average(),
                buckets: h
                    .bucket_counts()
                    .map(|(le, count)| BucketView { le, count })
                    .collect(),
                name: h.name,
                labels: h.labels,
                count: h.count,
                sum: h.sum,
            };
            (key, view)
        })
        .collect();

    HealthSnapshot {
        counters: store.counters().into_iter().collect(),
        histograms,
        gauges: store.gauges().into_iter().collect(),
        system,
    }
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub api: ApiSummary,
    pub auth: AuthSummary,
    pub database: DatabaseSummary,
    pub files: FileSummary,
    pub system: SystemSummary,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSummary {
    pub total_requests: f64,
    pub total_errors: f64,
    /// Percentage of requests with status >= 400.
    pub error_rate: f64,
    /// Seconds.
    pub average_response_time: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSummary {
    pub total_events: f64,
    pub successful: f64,
    pub failed: f64,
    pub success_rate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSummary {
    pub total_operations: f64,
    /// Seconds.
    pub average_operation_time: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub total_operations: f64,
    pub total_bytes: f64,
}

#[derive(Debug, Serialize)]
pub struct SystemSummary {
    pub uptime: f64,
    pub memory: MemoryUsage,
}

/// Aggregates across every label set of the business families.
pub fn summary(store: &MetricStore, sampler: &SystemSampler) -> Summary {
    let total_requests = store.counter_family_total(API_REQUESTS_TOTAL, |_| true);
    let total_errors = store.counter_family_total(API_ERRORS_TOTAL, |_| true);
    let (_, total_bytes) = store.histogram_family_totals(FILE_SIZE_BYTES);
    let successful = store.counter_family_total(AUTH_EVENTS_TOTAL, |l| l.get("success") == Some("true"));
    let failed = store.counter_family_total(AUTH_EVENTS_TOTAL, |l| l.get("success") == Some("false"));

    Summary {
        api: ApiSummary {
            total_requests,
            total_errors,
            error_rate: percent(total_errors, total_requests),
            average_response_time: family_average(store, API_REQUEST_DURATION_SECONDS),
        },
        auth: AuthSummary {
            total_events: successful + failed,
            successful,
            failed,
            success_rate: percent(successful, successful + failed),
        },
        database: DatabaseSummary {
            total_operations: store.counter_family_total(DATABASE_OPERATIONS_TOTAL, |_| true),
            average_operation_time: family_average(store, DATABASE_OPERATION_DURATION_SECONDS),
        },
        files: FileSummary {
            total_operations: store.counter_family_total(FILE_OPERATIONS_TOTAL, |_| true),
            total_bytes,
        },
        system: SystemSummary {
            uptime: sampler.uptime(),
            memory: sampler.memory_usage(),
        },
    }
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

fn family_average(store: &MetricStore, name: &str) -> f64 {
    match store.histogram_family_totals(name) {
        (0, _) => 0.0,
        (count, sum) => sum / count as f64,
    }
}
