//! # stockroom-api — Binary Entry Point
//!
//! Starts the Axum HTTP server: structured tracing, environment
//! configuration, one store handle constructed up front and injected
//! into the application state.

use std::sync::Arc;

use stockroom_api::oauth::{GithubProvider, IdentityProvider};
use stockroom_api::{AppConfig, AppState};
use stockroom_store::MongoStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;

    // The one long-lived store handle; the driver multiplexes.
    let mongodb_uri = std::env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let mongodb_db = std::env::var("MONGODB_DB").unwrap_or_else(|_| "inventory".to_string());
    let store = MongoStore::connect(&mongodb_uri, &mongodb_db)
        .await
        .map_err(|e| {
            tracing::error!("store initialization failed: {e}");
            e
        })?;

    // OAuth is optional: without credentials the handoff routes answer 503.
    let oauth: Option<Arc<dyn IdentityProvider>> = match &config.github {
        Some(github) => {
            tracing::info!("GitHub OAuth configured");
            Some(Arc::new(GithubProvider::new(github.clone())?))
        }
        None => {
            tracing::warn!("GitHub OAuth not configured; /api/auth/github will return 503");
            None
        }
    };

    let state = AppState::new(config, Arc::new(store), oauth);
    state.ensure_indexes().await.map_err(|e| {
        tracing::error!("index installation failed: {e}");
        e
    })?;

    let app = stockroom_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Stockroom API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
