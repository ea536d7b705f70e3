//! Shared application state for the tally gateway.
//!
//! One `MetricStore` is built here at startup and handed to everything that
//! records or exports: the recorder facade, the request-tracking middleware
//! and the ops handlers all hold the same `Arc`.

use std::sync::Arc;

use tally_core::{MetricStore, Recorder, SystemSampler};

use crate::config::TallyConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    store: Arc<MetricStore>,
    recorder: Recorder,
}

struct AppStateInner {
    cfg: TallyConfig,
    sampler: SystemSampler,
}

impl AppState {
    pub fn new(cfg: TallyConfig) -> Self {
        let store = Arc::new(MetricStore::with_event_capacity(
            cfg.metrics.event_log_capacity,
        ));
        Self::with_store(cfg, store)
    }

    /// Build around an existing store, e.g. one the host application already
    /// records into.
    pub fn with_store(cfg: TallyConfig, store: Arc<MetricStore>) -> Self {
        let recorder = Recorder::new(Arc::clone(&store));
        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                sampler: SystemSampler::new(),
            }),
            store,
            recorder,
        }
    }

    pub fn cfg(&self) -> &TallyConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> Arc<MetricStore> {
        Arc::clone(&self.store)
    }

    pub fn recorder(&self) -> &Recorder {
        &self.recorder
    }

    pub fn sampler(&self) -> &SystemSampler {
        &self.inner.sampler
    }
}
