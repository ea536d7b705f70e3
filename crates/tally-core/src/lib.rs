//! tally core: the in-process metrics engine.
//!
//! A label-aware counter/histogram/gauge store with a bounded raw-event log,
//! a business recording facade, a pull-based process sampler, and exporters
//! for Prometheus text and JSON snapshots. It carries no transport or runtime
//! dependencies; the gateway crate serves it over HTTP.
//!
//! Recording never fails: absent entities read as zero and event-log overflow
//! silently drops the oldest entries.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. The only fallible
//! paths (config, startup I/O) surface as `TallyError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod events;
pub mod export;
pub mod histogram;
pub mod labels;
pub mod recorder;
pub mod store;
pub mod system;

pub use error::{Result, TallyError};
pub use events::MetricEvent;
pub use histogram::Histogram;
pub use labels::Labels;
pub use recorder::Recorder;
pub use store::{Counter, Gauge, MetricStore};
pub use system::SystemSampler;
