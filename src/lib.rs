/// Hookflow: webhook-triggered workflow registry with an execution audit log
///
/// This library provides the registry of workflow definitions, the execution
/// path that records every run in a capped audit log, and the durable store
/// both are mirrored to.

// Core configuration and setup
pub mod config;

// Error taxonomy shared by all layers
pub mod error;

// Durable key-value store backing both collections
pub mod store;

// Workflow definitions and the registry
pub mod workflow;

// Execution engine and audit log
pub mod runtime;

// Single-writer state service publishing snapshots to views
pub mod state;

// HTTP API layer - REST endpoints for workflow management and webhook triggers
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use error::{ExecutionError, PersistenceError, ValidationError};
pub use runtime::{AuditLogEntry, ExecutionOutcome, ExecutionStatus};
pub use server::start_server;
pub use state::{StateSnapshot, WorkflowState};
pub use workflow::WorkflowDefinition;
