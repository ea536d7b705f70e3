//! Read-side renderings of the store.
//!
//! - `prometheus`: text exposition format for `/metrics`
//! - `health`: JSON health snapshot and derived summary

pub mod health;
pub mod prometheus;

pub use health::{health_snapshot, sampled_health_snapshot, summary, HealthSnapshot, Summary};
pub use prometheus::{render, CONTENT_TYPE};
