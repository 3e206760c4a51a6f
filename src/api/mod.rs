/// HTTP API Layer
///
/// This module provides the collaborator surface over `WorkflowState`:
/// - Workflow CRUD and audit log reads for editors and views
/// - Webhook trigger mapped onto workflow execution

// Workflow management endpoints (GET/POST/PUT/DELETE)
pub mod workflows;

// Webhook execution endpoints
pub mod webhooks;

// Re-export router builders
pub use webhooks::create_webhook_routes;
pub use workflows::{create_workflow_routes, AppState};
