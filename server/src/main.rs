//! MedBox Server - remote document store for MedBox sync.
//!
//! Holds named JSON documents behind a bearer token. Clients fetch a document
//! in full and replace it in full; there is no merging or versioning, the
//! last write wins.

mod auth;
mod config;
mod error;
mod handlers;
mod routes;
mod storage;

use crate::config::Config;
use crate::storage::DocumentStore;
use axum::extract::DefaultBodyLimit;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medbox_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing::info!("Starting MedBox Server on {}:{}", config.host, config.port);

    let store = DocumentStore::open(&config.data_dir).await?;
    tracing::info!("Serving documents from {}", store.dir().display());

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState {
        store: Arc::new(store),
        config: Arc::new(config),
    };
    let app = build_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the router with its middleware stack.
pub fn build_app(state: AppState) -> Router {
    let body_limit = state.config.max_document_bytes;

    Router::new()
        .merge(routes::create_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
