//! Label-keyed counter/histogram/gauge store.
//!
//! Each family is a `DashMap` keyed by canonical key. The entry guard held
//! during an update is the critical section for that key, so a histogram's
//! count, sum and buckets always move together. Reads never fail: absent
//! entities come back as zero (or `None` for histograms).

use dashmap::DashMap;
use serde::Serialize;

use crate::events::{EventLog, MetricEvent, DEFAULT_EVENT_CAPACITY};
use crate::histogram::Histogram;
use crate::labels::Labels;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Counter {
    pub name: String,
    pub value: f64,
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gauge {
    pub name: String,
    pub value: f64,
    pub labels: Labels,
}

pub struct MetricStore {
    counters: DashMap<String, Counter>,
    histograms: DashMap<String, Histogram>,
    gauges: DashMap<String, Gauge>,
    events: EventLog,
}

impl Default for MetricStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricStore {
    /// Empty store with the default event log capacity (1000).
    pub fn new() -> Self {
        Self::with_event_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Empty store keeping at most `capacity` events.
    pub fn with_event_capacity(capacity: usize) -> Self {
        Self {
            counters: DashMap::new(),
            histograms: DashMap::new(),
            gauges: DashMap::new(),
            events: EventLog::with_capacity(capacity),
        }
    }

    // --------------------
    // Counters
    // --------------------

    /// Add `delta` (any real number) to the counter, creating it at zero first.
    pub fn increment_counter(&self, name: &str, labels: &[(&str, &str)], delta: f64) {
        let labels = Labels::new(labels);
        let key = labels.canonical_key(name);
        self.counters
            .entry(key)
            .or_insert_with(|| Counter {
                name: name.to_string(),
                value: 0.0,
                labels: labels.clone(),
            })
            .value += delta;
        self.events.push(MetricEvent::now(name, delta, labels));
    }

    /// Current value, 0 when absent.
    pub fn get_counter(&self, name: &str, labels: &[(&str, &str)]) -> f64 {
        let key = Labels::new(labels).canonical_key(name);
        self.counters.get(&key).map(|c| c.value).unwrap_or(0.0)
    }

    // --------------------
    // Histograms
    // --------------------

    /// Observe one value.
    pub fn record_histogram(&self, name: &str, value: f64, labels: &[(&str, &str)]) {
        let labels = Labels::new(labels);
        let key = labels.canonical_key(name);
        self.histograms
            .entry(key)
            .or_insert_with(|| Histogram::new(name, labels.clone()))
            .observe(value);
        self.events.push(MetricEvent::now(name, value, labels));
    }

    /// Copy of the histogram, `None` when absent.
    pub fn get_histogram(&self, name: &str, labels: &[(&str, &str)]) -> Option<Histogram> {
        let key = Labels::new(labels).canonical_key(name);
        self.histograms.get(&key).map(|h| h.value().clone())
    }

    // --------------------
    // Gauges
    // --------------------

    /// Set to an absolute value.
    pub fn set_gauge(&self, name: &str, value: f64, labels: &[(&str, &str)]) {
        self.update_gauge(name, labels, value, |_, v| v);
    }

    /// Add `value`, starting from 0 when absent.
    pub fn increment_gauge(&self, name: &str, value: f64, labels: &[(&str, &str)]) {
        self.update_gauge(name, labels, value, |cur, v| cur + v);
    }

    /// Recorded in the event log as a negative delta.
    pub fn decrement_gauge(&self, name: &str, value: f64, labels: &[(&str, &str)]) {
        self.update_gauge(name, labels, -value, |cur, v| cur + v);
    }

    /// Current value, 0 when absent.
    pub fn get_gauge(&self, name: &str, labels: &[(&str, &str)]) -> f64 {
        let key = Labels::new(labels).canonical_key(name);
        self.gauges.get(&key).map(|g| g.value).unwrap_or(0.0)
    }

    fn update_gauge(
        &self,
        name: &str,
        labels: &[(&str, &str)],
        value: f64,
        apply: impl FnOnce(f64, f64) -> f64,
    ) {
        let labels = Labels::new(labels);
        let key = labels.canonical_key(name);
        {
            let mut gauge = self.gauges.entry(key).or_insert_with(|| Gauge {
                name: name.to_string(),
                value: 0.0,
                labels: labels.clone(),
            });
            gauge.value = apply(gauge.value, value);
        }
        self.events.push(MetricEvent::now(name, value, labels));
    }

    // --------------------
    // Snapshots
    // --------------------

    /// Point-in-time copies as `(canonical key, counter)` pairs.
    pub fn counters(&self) -> Vec<(String, Counter)> {
        self.counters
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }

    /// Point-in-time copies of every histogram.
    pub fn histograms(&self) -> Vec<(String, Histogram)> {
        self.histograms
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }

    /// Point-in-time copies of every gauge.
    pub fn gauges(&self) -> Vec<(String, Gauge)> {
        self.gauges
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect()
    }

    /// Sum of every counter of family `name` whose labels satisfy `filter`.
    pub fn counter_family_total(&self, name: &str, filter: impl Fn(&Labels) -> bool) -> f64 {
        self.counters
            .iter()
            .filter(|r| r.name == name && filter(&r.labels))
            .map(|r| r.value)
            .sum()
    }

    /// `(Σcount, Σsum)` across every label set of histogram family `name`.
    pub fn histogram_family_totals(&self, name: &str) -> (u64, f64) {
        self.histograms
            .iter()
            .filter(|r| r.name == name)
            .fold((0, 0.0), |(count, sum), r| (count + r.count, sum + r.sum))
    }

    // --------------------
    // Event log
    // --------------------

    /// Newest `limit` events, oldest first.
    pub fn recent_events(&self, limit: usize) -> Vec<MetricEvent> {
        self.events.recent(limit)
    }

    /// Number of events currently retained.
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Maximum number of retained events.
    pub fn event_capacity(&self) -> usize {
        self.events.capacity()
    }

    /// Drop every entity and the event log.
    pub fn reset(&self) {
        self.counters.clear();
        self.histograms.clear();
        self.gauges.clear();
        self.events.clear();
        tracing::debug!("metric store reset");
    }
}
