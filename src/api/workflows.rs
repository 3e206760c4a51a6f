/// Workflow management REST API endpoints
///
/// The editor-facing surface: list, read, save and delete workflow
/// definitions, read the audit log, and read the whole state snapshot.
/// Required-field validation happens here, before anything reaches the registry.

use crate::{
    error::{PersistenceError, ValidationError},
    runtime::{AuditLogEntry, ExecutionStatus},
    state::{StateSnapshot, WorkflowState},
    workflow::WorkflowDefinition,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Single writer for registry and audit log
    pub state: Arc<WorkflowState>,
}

/// Error response: status code plus `{ "error": message }`
pub type ApiError = (StatusCode, Json<Value>);

pub(crate) fn api_error(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    (status, Json(json!({ "error": message.to_string() })))
}

pub(crate) fn persistence_error(e: PersistenceError) -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, e)
}

/// Query string for the log listing
#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    /// Only entries with this status ("success" or "error")
    pub status: Option<ExecutionStatus>,
}

/// Create workflow management routes
pub fn create_workflow_routes() -> Router<AppState> {
    Router::new()
        .route("/api/workflows", get(list_workflows).post(create_workflow))
        .route(
            "/api/workflows/{id}",
            get(get_workflow).put(update_workflow).delete(delete_workflow),
        )
        .route("/api/logs", get(list_logs))
        .route("/api/state", get(get_state))
}

/// Reject definitions the editor would not let through
pub fn validate(definition: &WorkflowDefinition) -> Result<(), ValidationError> {
    if definition.name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

/// GET /api/workflows
async fn list_workflows(State(app): State<AppState>) -> Json<Value> {
    let snapshot = app.state.snapshot();
    Json(json!({ "workflows": snapshot.workflows }))
}

/// GET /api/workflows/{id}
async fn get_workflow(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowDefinition>, ApiError> {
    app.state
        .get(&id)
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "workflow not found"))
}

/// POST /api/workflows
///
/// Body: a workflow definition. A missing or unregistered `id` creates a new workflow.
async fn create_workflow(
    State(app): State<AppState>,
    Json(definition): Json<WorkflowDefinition>,
) -> Result<(StatusCode, Json<WorkflowDefinition>), ApiError> {
    validate(&definition).map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    let saved = app.state.save(definition).await.map_err(persistence_error)?;

    tracing::info!("🔥 Saved workflow via API: {} ({})", saved.id, saved.name);

    Ok((StatusCode::CREATED, Json(saved)))
}

/// PUT /api/workflows/{id}
///
/// The path id replaces any id in the body. If it is not registered the
/// save falls through to create and the response carries the new id.
async fn update_workflow(
    State(app): State<AppState>,
    Path(id): Path<String>,
    Json(mut definition): Json<WorkflowDefinition>,
) -> Result<Json<WorkflowDefinition>, ApiError> {
    definition.id = id;
    validate(&definition).map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    let saved = app.state.save(definition).await.map_err(persistence_error)?;
    Ok(Json(saved))
}

/// DELETE /api/workflows/{id}
async fn delete_workflow(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    app.state.delete(&id).await.map_err(persistence_error)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/logs?status=error
async fn list_logs(
    State(app): State<AppState>,
    Query(query): Query<LogsQuery>,
) -> Json<Vec<AuditLogEntry>> {
    match query.status {
        Some(status) => Json(app.state.logs_by_status(status)),
        None => Json(app.state.snapshot().logs.as_ref().clone()),
    }
}

/// GET /api/state
async fn get_state(State(app): State<AppState>) -> Json<Arc<StateSnapshot>> {
    Json(app.state.snapshot())
}
