//! Integration tests for the HTTP surface over an in-memory store.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use hookflow::{
    runtime::{EchoDispatcher, MAX_LOG_ENTRIES},
    server::{create_state, router},
    store::{MemoryStore, SqliteStore},
    WorkflowState,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn build_app() -> (Router, Arc<WorkflowState>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = create_state(store.clone(), Arc::new(EchoDispatcher))
        .await
        .unwrap();
    (router(Arc::clone(&state)), state, store)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

// ---------------------------------------------------------------------------
// Workflow management
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_fetch_workflow() {
    let (app, _state, _store) = build_app().await;

    let (status, created) = send(&app, Method::POST, "/api/workflows", Some(json!({ "name": "Ping" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert!(created["updatedAt"].is_string());

    let (status, fetched) = send(&app, Method::GET, &format!("/api/workflows/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (_, list) = send(&app, Method::GET, "/api/workflows", None).await;
    assert_eq!(list["workflows"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn blank_name_is_rejected_before_save() {
    let (app, state, _store) = build_app().await;

    let (status, body) = send(&app, Method::POST, "/api/workflows", Some(json!({ "name": "  " }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "workflow name must not be empty");
    assert!(state.snapshot().workflows.is_empty());
}

#[tokio::test]
async fn update_keeps_id_and_unknown_put_creates() {
    let (app, _state, _store) = build_app().await;
    let (_, created) = send(&app, Method::POST, "/api/workflows", Some(json!({ "name": "A" }))).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/workflows/{id}"),
        Some(json!({ "name": "A2", "description": "edited" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["name"], "A2");

    let (_, fresh) = send(&app, Method::PUT, "/api/workflows/not-there", Some(json!({ "name": "B" }))).await;
    assert_ne!(fresh["id"], "not-there");

    let (_, list) = send(&app, Method::GET, "/api/workflows", None).await;
    assert_eq!(list["workflows"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (app, state, _store) = build_app().await;
    let (_, created) = send(&app, Method::POST, "/api/workflows", Some(json!({ "name": "Gone" }))).await;
    let uri = format!("/api/workflows/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(state.snapshot().workflows.is_empty());
}

#[tokio::test]
async fn store_failure_surfaces_as_500_and_state_error() {
    let (app, state, store) = build_app().await;
    store.set_reject_writes(true);

    let (status, body) = send(&app, Method::POST, "/api/workflows", Some(json!({ "name": "X" }))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("workflows"));
    let snapshot = state.snapshot();
    assert!(snapshot.workflows.is_empty());
    assert!(snapshot.error.is_some());
}

// ---------------------------------------------------------------------------
// Webhook execution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn webhook_for_known_workflow_echoes_payload() {
    let (app, _state, _store) = build_app().await;
    let (_, created) = send(&app, Method::POST, "/api/workflows", Some(json!({ "name": "W" }))).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::POST, &format!("/webhook/{id}"), Some(json!({ "x": 5 }))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Workflow executed successfully");
    assert_eq!(body["data"], json!({ "x": 5 }));

    let (_, logs) = send(&app, Method::GET, "/api/logs", None).await;
    let logs = logs.as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["workflowId"], id.as_str());
    assert_eq!(logs[0]["workflowName"], "W");
    assert_eq!(logs[0]["status"], "success");
}

#[tokio::test]
async fn webhook_for_unknown_workflow_is_404_and_logged() {
    let (app, _state, _store) = build_app().await;

    let (status, body) = send(&app, Method::POST, "/webhook/unknown-id", Some(json!({ "a": 1 }))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": "error", "error": "workflow not found" }));

    let (_, errors) = send(&app, Method::GET, "/api/logs?status=error", None).await;
    let errors = errors.as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["workflowName"], "Unknown");
    assert_eq!(errors[0]["payload"], json!({ "a": 1 }));

    let (_, successes) = send(&app, Method::GET, "/api/logs?status=success", None).await;
    assert!(successes.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn webhook_rejects_malformed_json_without_logging() {
    let (app, state, _store) = build_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/webhook/anything")
        .body(Body::from("{broken"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(state.snapshot().logs.is_empty());
}

#[tokio::test]
async fn manual_execute_uses_field_defaults() {
    let (app, _state, _store) = build_app().await;
    let (_, created) = send(
        &app,
        Method::POST,
        "/api/workflows",
        Some(json!({
            "name": "Form",
            "fields": [
                { "id": "f1", "name": "city", "type": "text", "defaultValue": "Oslo" },
                { "id": "f2", "name": "note", "type": "textarea" }
            ]
        })),
    )
    .await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(&app, Method::POST, &format!("/api/workflows/{id}/execute"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({ "city": "Oslo", "note": "" }));
}

#[tokio::test]
async fn log_stays_capped_through_webhooks() {
    let (app, state, _store) = build_app().await;
    for n in 0..=MAX_LOG_ENTRIES {
        send(&app, Method::POST, "/webhook/missing", Some(json!({ "n": n }))).await;
    }

    let snapshot = state.snapshot();
    assert_eq!(snapshot.logs.len(), MAX_LOG_ENTRIES);
    assert_eq!(snapshot.logs[0].payload, json!({ "n": MAX_LOG_ENTRIES }));
    assert_eq!(snapshot.logs[MAX_LOG_ENTRIES - 1].payload, json!({ "n": 1 }));
}

#[tokio::test]
async fn state_survives_restart_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();

    let saved_id = {
        let store = SqliteStore::open(dir.path()).await.unwrap();
        let state = create_state(Arc::new(store), Arc::new(EchoDispatcher)).await.unwrap();
        let app = router(state);
        let (_, created) = send(&app, Method::POST, "/api/workflows", Some(json!({ "name": "Durable" }))).await;
        let id = created["id"].as_str().unwrap().to_string();
        send(&app, Method::POST, &format!("/webhook/{id}"), Some(json!({ "k": "v" }))).await;
        id
    };

    let store = SqliteStore::open(dir.path()).await.unwrap();
    let state = create_state(Arc::new(store), Arc::new(EchoDispatcher)).await.unwrap();
    let app = router(state);

    let (status, snapshot) = send(&app, Method::GET, "/api/state", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["loading"], false);
    assert_eq!(snapshot["workflows"][0]["id"], saved_id.as_str());
    assert_eq!(snapshot["logs"][0]["payload"], json!({ "k": "v" }));
}
