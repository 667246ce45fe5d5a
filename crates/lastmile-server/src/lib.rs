//! Lastmile Server - dashboard pages over HTTP
//!
//! Routes every request on `/` by its `p` query parameter to one of the core
//! workflows and wraps the result in the page template.

pub mod http;
pub mod page;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use lastmile_core::{DashboardConfig, Session};

/// Shared application state
pub struct AppState {
    pub config: DashboardConfig,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self { config }
    }

    /// Open a fresh session for one request
    pub fn open_session(&self) -> lastmile_core::Result<Session> {
        Session::open(&self.config.database.path)
    }

    /// Prepare the database before serving
    ///
    /// Creates the items table when `database.create_if_missing` is set.
    pub fn initialize(&self) -> lastmile_core::Result<()> {
        if self.config.database.create_if_missing {
            let session = self.open_session()?;
            session.ensure_items_table(&self.config.database.items_table)?;
            tracing::info!(
                "Items table {} ready in {:?}",
                self.config.database.items_table,
                self.config.database.path
            );
        }
        Ok(())
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

/// Create the dashboard router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(http::show_page).post(http::submit_edit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Lastmile dashboard listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
