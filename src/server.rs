/// Server setup and initialization
///
/// Wires together the durable store, the workflow state and the HTTP routes.
/// Provides the main application factory function for creating the Axum app.

use crate::{
    api::{create_webhook_routes, create_workflow_routes, AppState},
    config::Config,
    runtime::{Dispatcher, EchoDispatcher},
    state::WorkflowState,
    store::{DurableStore, SqliteStore},
};
use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Build the router over an already loaded state
pub fn router(state: Arc<WorkflowState>) -> Router {
    let app_state = AppState { state };

    Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        // Workflow management and audit log routes
        .merge(create_workflow_routes())
        // Webhook execution routes
        .merge(create_webhook_routes())
        .with_state(app_state)
}

/// Create the workflow state over `store` and load persisted collections
pub async fn create_state(
    store: Arc<dyn DurableStore>,
    dispatcher: Arc<dyn Dispatcher>,
) -> Result<Arc<WorkflowState>> {
    let state = Arc::new(WorkflowState::new(store, dispatcher));

    tracing::info!("📥 Loading workflows and audit log from durable store");
    state
        .load()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load state from durable store: {}", e))?;

    Ok(state)
}

/// Create the main Axum application with all routes
///
/// Opens the SQLite store under the configured data directory and uses the
/// echo dispatcher, so executions perform no network I/O.
pub async fn create_app(config: &Config) -> Result<Router> {
    tracing::info!("📁 Using data directory: {}", config.storage.data_dir);
    let store = SqliteStore::open(&config.storage.data_dir).await?;

    let state = create_state(Arc::new(store), Arc::new(EchoDispatcher)).await?;

    tracing::info!("✅ Application initialized successfully");

    Ok(router(state))
}

/// Start the HTTP server with the given configuration
pub async fn start_server(config: Config) -> Result<()> {
    // RUST_LOG overrides the default info level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting Hookflow server...");

    let app = create_app(&config).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
