//! tally gateway library entry.
//!
//! Serves the metrics engine over HTTP: Prometheus scraping, JSON health and
//! summary snapshots, the raw event tail, and a middleware that records every
//! routed request. Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod ops;
pub mod router;
pub mod track;
