//! Bounded raw-event log.
//!
//! Every store mutation appends one `MetricEvent`. Once the log holds
//! `capacity` entries the oldest is evicted on append; writers never block on
//! capacity and are never rejected.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::labels::Labels;

pub const DEFAULT_EVENT_CAPACITY: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricEvent {
    pub name: String,
    pub value: f64,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub labels: Labels,
}

impl MetricEvent {
    /// Event stamped with the current wall-clock time.
    pub fn now(name: &str, value: f64, labels: Labels) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            name: name.to_string(),
            value,
            timestamp,
            labels,
        }
    }
}

pub struct EventLog {
    capacity: usize,
    inner: Mutex<VecDeque<MetricEvent>>,
}

impl EventLog {
    /// Capacity below 1 is raised to 1.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    // A panicking writer cannot leave the deque half-updated, so poison is ignored.
    fn lock(&self) -> MutexGuard<'_, VecDeque<MetricEvent>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append, evicting the oldest entries beyond capacity.
    pub fn push(&self, event: MetricEvent) {
        let mut log = self.lock();
        while log.len() >= self.capacity {
            log.pop_front();
        }
        log.push_back(event);
    }

    /// Newest `limit` events, oldest first.
    pub fn recent(&self, limit: usize) -> Vec<MetricEvent> {
        let log = self.lock();
        let skip = log.len().saturating_sub(limit);
        log.iter().skip(skip).cloned().collect()
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of retained events.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every retained event.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}
