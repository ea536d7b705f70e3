//! tally gateway binary.
//!
//! Loads `TALLY_CONFIG` (default `tally.yaml`), builds the shared metric store
//! and serves the metrics endpoints.

use tracing_subscriber::{fmt, EnvFilter};

use tally_core::error::Result;
use tally_gateway::{app_state, config, router};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::var("TALLY_CONFIG").unwrap_or_else(|_| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::load_from_file(&path).inspect_err(|e| {
        tracing::error!(%path, error = %e, "config load failed");
    })?;
    let listen = cfg.server.listen_addr()?;

    let state = app_state::AppState::new(cfg);
    let app = router::build_router(state);

    tracing::info!(%listen, "tally-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await?;

    axum::serve(listener, app).await?;
    Ok(())
}
