/// Webhook trigger endpoints
///
/// Maps `POST /webhook/{workflow_id}` onto `WorkflowState::execute` and turns
/// the outcome into an HTTP response. Every request that reaches the state
/// produces exactly one audit entry, whatever the outcome.

use crate::{
    api::workflows::{api_error, persistence_error, ApiError, AppState},
    runtime::ExecutionOutcome,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde_json::{json, Value};

/// Create webhook routes
pub fn create_webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/webhook/{workflow_id}", post(execute_webhook))
        .route("/api/workflows/{id}/execute", post(execute_manual))
}

/// Execute a workflow via webhook trigger
///
/// POST /webhook/{workflow_id}
/// Body: JSON payload handed to the workflow. An empty body is `{}`.
async fn execute_webhook(
    State(app): State<AppState>,
    Path(workflow_id): Path<String>,
    body: String,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    tracing::info!("📥 Webhook request received: {}", workflow_id);

    let payload = match parse_payload(&body) {
        Some(Ok(json)) => json,
        Some(Err(e)) => {
            tracing::warn!("❌ Invalid JSON payload for webhook {}: {}", workflow_id, e);
            return Err(api_error(StatusCode::BAD_REQUEST, "invalid JSON payload"));
        }
        None => json!({}),
    };

    run(&app, &workflow_id, payload).await
}

/// Execute a workflow from the detail view
///
/// POST /api/workflows/{id}/execute
/// Without a body the payload is built from the fields' default values.
async fn execute_manual(
    State(app): State<AppState>,
    Path(id): Path<String>,
    body: String,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let payload = match parse_payload(&body) {
        Some(parsed) => parsed.map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?,
        None => app
            .state
            .get(&id)
            .map(|workflow| workflow.default_payload())
            .unwrap_or_else(|| json!({})),
    };

    run(&app, &id, payload).await
}

/// `None` for a blank body
fn parse_payload(body: &str) -> Option<Result<Value, serde_json::Error>> {
    if body.trim().is_empty() {
        None
    } else {
        Some(serde_json::from_str(body))
    }
}

async fn run(
    app: &AppState,
    workflow_id: &str,
    payload: Value,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let outcome = app
        .state
        .execute(workflow_id, payload)
        .await
        .map_err(persistence_error)?;

    let status = match &outcome {
        ExecutionOutcome::Success { .. } => StatusCode::OK,
        ExecutionOutcome::NotFound { .. } => StatusCode::NOT_FOUND,
        // Dispatcher reported a failure; store faults are 500 via persistence_error
        ExecutionOutcome::Failed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
    };

    Ok((status, Json(outcome.to_body())))
}
