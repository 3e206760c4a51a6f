/// Runtime Execution Layer
///
/// This module provides workflow execution and its audit trail:
/// - Resolving a workflow and dispatching the payload
/// - Recording exactly one audit entry per execution
/// - Keeping the audit log capped and newest-first

// Execution engine and the dispatcher seam
pub mod engine;

// Capped audit log of executions
pub mod audit;

// Re-export main types
pub use audit::{AuditLog, AuditLogEntry, ExecutionStatus, MAX_LOG_ENTRIES};
pub use engine::{Dispatcher, EchoDispatcher, Execution, ExecutionEngine, ExecutionOutcome};
