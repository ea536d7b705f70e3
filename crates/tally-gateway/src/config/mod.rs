//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use tally_core::error::{Result, TallyError};

pub use schema::{MetricsSection, ServerSection, TallyConfig};

/// Config path used when `TALLY_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "tally.yaml";

pub fn load_from_file(path: &str) -> Result<TallyConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TallyError::Internal(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<TallyConfig> {
    let cfg: TallyConfig = serde_yaml::from_str(s)
        .map_err(|e| TallyError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
