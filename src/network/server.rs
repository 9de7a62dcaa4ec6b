//! HTTP Server
//!
//! Binds the listener, serves the router and stops on Ctrl+C.

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::{ProfileError, Result};
use crate::query::QueryService;

use super::handlers;

/// Build the API router over `service`
pub fn router(service: QueryService) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/fid/:fid", get(handlers::by_fid))
        .route("/location", get(handlers::by_location))
        .fallback(handlers::not_found)
        .with_state(service)
}

/// HTTP server for the Query Service
pub struct Server {
    config: Config,
}

impl Server {
    /// Create a new server with the given config
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Serve until Ctrl+C
    ///
    /// Refuses to start when the database file does not exist.
    pub async fn run(self) -> Result<()> {
        if !self.config.db_path.is_file() {
            return Err(ProfileError::DatabaseMissing(self.config.db_path.clone()));
        }

        let listener = TcpListener::bind(&self.config.listen_addr).await?;
        tracing::info!(
            "Serving {} on http://{}",
            self.config.db_path.display(),
            listener.local_addr()?
        );

        let app = router(QueryService::from_config(&self.config));
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

/// Resolves on Ctrl+C
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Received Ctrl+C, initiating shutdown..."),
        Err(e) => {
            tracing::warn!("Could not install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
