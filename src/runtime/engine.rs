/// Workflow execution engine
///
/// Resolves a workflow id against a registry snapshot, hands the payload to a
/// `Dispatcher`, and builds exactly one audit entry describing the outcome.
/// Nothing escapes the engine as a fault: an unknown id or a failed dispatch
/// becomes an error outcome.

use crate::{
    error::ExecutionError,
    runtime::audit::{AuditLogEntry, ExecutionStatus, UNKNOWN_WORKFLOW_NAME},
    workflow::types::WorkflowDefinition,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Seam where a production deployment performs the workflow's real request
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, workflow: &WorkflowDefinition, payload: &Value) -> anyhow::Result<Value>;
}

/// Stand-in dispatcher that performs no I/O and echoes the payload back
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoDispatcher;

#[async_trait]
impl Dispatcher for EchoDispatcher {
    async fn dispatch(&self, _workflow: &WorkflowDefinition, payload: &Value) -> anyhow::Result<Value> {
        Ok(json!({
            "message": "Workflow executed successfully",
            "data": payload,
        }))
    }
}

/// Result of one execution as seen by the caller
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Success { response: Value },
    /// The workflow id did not resolve
    NotFound { message: String },
    /// The dispatcher reported a failure
    Failed { message: String },
}

impl ExecutionOutcome {
    pub fn status(&self) -> ExecutionStatus {
        match self {
            Self::Success { .. } => ExecutionStatus::Success,
            Self::NotFound { .. } | Self::Failed { .. } => ExecutionStatus::Error,
        }
    }

    /// Response body shape used by the webhook surface
    pub fn to_body(&self) -> Value {
        match self {
            Self::Success { response } => response.clone(),
            Self::NotFound { message } | Self::Failed { message } => {
                json!({ "status": "error", "error": message })
            }
        }
    }
}

/// An outcome together with the audit entry that records it
#[derive(Debug, Clone)]
pub struct Execution {
    pub outcome: ExecutionOutcome,
    pub entry: AuditLogEntry,
}

pub struct ExecutionEngine {
    dispatcher: Arc<dyn Dispatcher>,
}

impl ExecutionEngine {
    pub fn new(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Execute `workflow_id` against `payload`
    ///
    /// `workflows` is the registry snapshot taken when the call began; later
    /// registry changes do not affect an execution in flight.
    pub async fn execute(
        &self,
        workflows: &[WorkflowDefinition],
        workflow_id: &str,
        payload: Value,
    ) -> Execution {
        let start_time = std::time::Instant::now();

        let Some(workflow) = workflows.iter().find(|w| w.id == workflow_id) else {
            let message = ExecutionError::NotFound(workflow_id.to_string()).to_string();
            tracing::warn!("❌ Execution requested for unknown workflow: {}", workflow_id);
            let entry =
                AuditLogEntry::failure(workflow_id, UNKNOWN_WORKFLOW_NAME, payload, message.clone());
            return Execution {
                outcome: ExecutionOutcome::NotFound { message },
                entry,
            };
        };

        tracing::info!("🚀 Executing workflow: {} ({})", workflow.id, workflow.name);
        tracing::debug!("📄 Payload: {}", payload);

        let execution = match self.dispatcher.dispatch(workflow, &payload).await {
            Ok(response) => {
                let entry = AuditLogEntry::success(
                    workflow.id.as_str(),
                    workflow.name.as_str(),
                    payload,
                    response.clone(),
                );
                Execution {
                    outcome: ExecutionOutcome::Success { response },
                    entry,
                }
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!("❌ Dispatch failed for workflow {}: {}", workflow.id, message);
                let entry = AuditLogEntry::failure(
                    workflow.id.as_str(),
                    workflow.name.as_str(),
                    payload,
                    message.clone(),
                );
                Execution {
                    outcome: ExecutionOutcome::Failed { message },
                    entry,
                }
            }
        };

        tracing::info!(
            "🎉 Workflow {} finished with {:?} in {:?}",
            workflow.id,
            execution.outcome.status(),
            start_time.elapsed()
        );

        execution
    }
}
