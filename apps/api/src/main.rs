mod config;
mod db;
mod errors;
mod feedback;
mod interviews;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;

#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StoreBackend};
use crate::db::{create_pool, ensure_schema};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.google_api_key.clone())
        .context("Failed to build HTTP client for the model API")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let state = AppState {
        store,
        model: Arc::new(llm),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Connects the configured document store backend.
async fn build_store(config: &Config) -> Result<Arc<dyn DocumentStore>> {
    match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store")?;
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            info!("Document store: postgres");
            Ok(Arc::new(PgDocumentStore::new(pool)))
        }
        StoreBackend::Memory => {
            warn!("Document store: memory (data is lost on restart)");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
    }
}
