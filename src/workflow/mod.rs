/// Workflow Management Layer
///
/// This module handles workflow definitions and the in-memory registry:
/// - Type definitions (WorkflowDefinition, Credential, Field, QueryTemplate)
/// - Registry with create/update/delete mirrored to the durable store

// Core workflow type definitions
pub mod types;

// Registry using ArcSwap for atomic commit after persistence
pub mod registry;

// Re-export commonly used types
pub use registry::WorkflowRegistry;
pub use types::{
    Credential, CredentialType, Field, FieldOption, FieldType, QueryTemplate, QueryType,
    WebhookAuthentication, WebhookSettings, WorkflowDefinition,
};
