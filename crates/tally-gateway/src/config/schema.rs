use std::net::SocketAddr;

use serde::Deserialize;
use tally_core::error::{Result, TallyError};
use tally_core::events::DEFAULT_EVENT_CAPACITY;

const MAX_EVENT_LOG_CAPACITY: usize = 100_000;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TallyConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl TallyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TallyError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.metrics.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            TallyError::BadRequest(format!(
                "server.listen must be a valid SocketAddr ({}): {e}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:9464".into()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_event_log_capacity")]
    pub event_log_capacity: usize,

    /// Record every routed request through the API-call recorder.
    #[serde(default = "default_track_requests")]
    pub track_requests: bool,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            event_log_capacity: default_event_log_capacity(),
            track_requests: default_track_requests(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_EVENT_LOG_CAPACITY).contains(&self.event_log_capacity) {
            return Err(TallyError::BadRequest(format!(
                "metrics.event_log_capacity must be between 1 and {MAX_EVENT_LOG_CAPACITY}"
            )));
        }
        Ok(())
    }
}

fn default_event_log_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}
fn default_track_requests() -> bool {
    true
}
