/// Hookflow server entry point
///
/// Loads configuration from the environment and starts the HTTP server.

use hookflow::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Workflow management API at /api/workflows/*
/// - Audit log at /api/logs and the full snapshot at /api/state
/// - Webhook execution at /webhook/{workflow_id}
/// - Health check at /healthz
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to 0.0.0.0:3004 and ./data/hookflow.db
    let config = Config::from_env();

    start_server(config).await?;

    Ok(())
}
