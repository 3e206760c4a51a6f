/// Workflow state service
///
/// Owns the registry, the audit log and the execution engine, and is the only
/// writer to any of them. Every mutation (`load`, `save`, `delete`, `execute`)
/// runs under one lock, commits or rolls back as a unit, and then publishes a
/// new `StateSnapshot` to subscribers. Reads of the last published snapshot
/// never wait on the lock.

use crate::{
    error::PersistenceError,
    runtime::{
        AuditLog, AuditLogEntry, Dispatcher, Execution, ExecutionEngine, ExecutionOutcome,
        ExecutionStatus,
    },
    store::DurableStore,
    workflow::{WorkflowDefinition, WorkflowRegistry},
};
use serde::Serialize;
use serde_json::Value;
use std::{future::Future, sync::Arc};
use tokio::sync::{watch, Mutex};

/// Everything a view needs to render, as of the last committed mutation
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    pub workflows: Arc<Vec<WorkflowDefinition>>,
    /// Newest first
    pub logs: Arc<Vec<AuditLogEntry>>,
    /// True only while the startup load is in flight
    pub loading: bool,
    /// Message of the most recent failed mutation, cleared by the next success
    pub error: Option<String>,
}

pub struct WorkflowState {
    registry: WorkflowRegistry,
    audit_log: AuditLog,
    engine: ExecutionEngine,
    /// Held for the whole of each mutation, including execution suspension
    writer: Mutex<()>,
    snapshots: watch::Sender<Arc<StateSnapshot>>,
}

impl WorkflowState {
    /// Create an empty state over `store`; wrap it in an `Arc` and call `load`
    /// to pick up persisted data
    pub fn new(store: Arc<dyn DurableStore>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        let (snapshots, _) = watch::channel(Arc::new(StateSnapshot::default()));
        Self {
            registry: WorkflowRegistry::new(Arc::clone(&store)),
            audit_log: AuditLog::new(store),
            engine: ExecutionEngine::new(dispatcher),
            writer: Mutex::new(()),
            snapshots,
        }
    }

    /// Last published snapshot
    pub fn snapshot(&self) -> Arc<StateSnapshot> {
        self.snapshots.borrow().clone()
    }

    /// Receive every snapshot published from now on
    pub fn subscribe(&self) -> watch::Receiver<Arc<StateSnapshot>> {
        self.snapshots.subscribe()
    }

    pub fn get(&self, id: &str) -> Option<WorkflowDefinition> {
        self.registry.get(id)
    }

    pub fn logs_by_status(&self, status: ExecutionStatus) -> Vec<AuditLogEntry> {
        self.audit_log.list_by_status(status)
    }

    /// Load both collections from the durable store
    ///
    /// Both blobs are read before either collection is replaced, so a failed
    /// load leaves the previous state in place.
    pub async fn load(self: &Arc<Self>) -> Result<(), PersistenceError> {
        self.commit("load", |state| async move {
            state.publish(true, None);
            let workflows = state.registry.read_stored().await?;
            let logs = state.audit_log.read_stored().await?;
            state.registry.install(workflows);
            state.audit_log.install(logs);
            Ok(())
        })
        .await
    }

    /// Create or update a workflow (see `WorkflowRegistry::save` for the id policy)
    pub async fn save(
        self: &Arc<Self>,
        definition: WorkflowDefinition,
    ) -> Result<WorkflowDefinition, PersistenceError> {
        self.commit("save", |state| async move { state.registry.save(definition).await })
            .await
    }

    /// Delete a workflow; an absent id is a successful no-op
    pub async fn delete(self: &Arc<Self>, id: &str) -> Result<(), PersistenceError> {
        let id = id.to_string();
        self.commit("delete", |state| async move { state.registry.delete(&id).await })
            .await
    }

    /// Execute a workflow and append its audit entry
    ///
    /// An unknown id or failed dispatch is an `Ok` error outcome. `Err` means
    /// the audit entry could not be persisted and was not kept.
    pub async fn execute(
        self: &Arc<Self>,
        workflow_id: &str,
        payload: Value,
    ) -> Result<ExecutionOutcome, PersistenceError> {
        let workflow_id = workflow_id.to_string();
        self.commit("execute", |state| async move {
            let workflows = state.registry.list();
            let Execution { outcome, entry } =
                state.engine.execute(&workflows, &workflow_id, payload).await;
            state.audit_log.append(entry).await?;
            Ok(outcome)
        })
        .await
    }

    /// Run `mutation` under the writer lock on its own task
    ///
    /// The task is detached from the caller: dropping the returned future
    /// (client disconnect, timeout) does not stop a mutation that has started.
    async fn commit<T, F, Fut>(
        self: &Arc<Self>,
        operation: &'static str,
        mutation: F,
    ) -> Result<T, PersistenceError>
    where
        T: Send + 'static,
        F: FnOnce(Arc<Self>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, PersistenceError>> + Send + 'static,
    {
        let state = Arc::clone(self);
        let task = tokio::spawn(async move {
            let _writer = state.writer.lock().await;
            let result = mutation(Arc::clone(&state)).await;
            state.finish(operation, result)
        });
        task.await?
    }

    /// Publish the post-mutation snapshot and pass the result through
    fn finish<T>(
        &self,
        operation: &str,
        result: Result<T, PersistenceError>,
    ) -> Result<T, PersistenceError> {
        match &result {
            Ok(_) => self.publish(false, None),
            Err(e) => {
                tracing::error!("❌ {} failed, state rolled back: {}", operation, e);
                self.publish(false, Some(e.to_string()));
            }
        }
        result
    }

    fn publish(&self, loading: bool, error: Option<String>) {
        self.snapshots.send_replace(Arc::new(StateSnapshot {
            workflows: self.registry.list(),
            logs: self.audit_log.list(),
            loading,
            error,
        }));
    }
}
