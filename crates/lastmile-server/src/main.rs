//! Lastmile Server Binary
//!
//! Standalone server for the dashboard pages.

use std::sync::Arc;

use lastmile_core::DashboardConfig;
use lastmile_server::{serve, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let project_root = std::env::current_dir().ok();
    let mut config = DashboardConfig::load_standard(project_root.as_deref())?;
    if let Ok(addr) = std::env::var("LASTMILE_ADDR") {
        config.server.addr = addr;
    }
    config.validate()?;

    let addr = config.server.addr.clone();
    let state = Arc::new(AppState::new(config));
    state.initialize()?;

    serve(&addr, state).await
}
