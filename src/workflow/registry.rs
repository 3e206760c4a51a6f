/// Workflow registry backed by ArcSwap
///
/// Holds the authoritative in-memory collection of workflow definitions and
/// mirrors every mutation to the durable store. A mutation builds the next
/// collection off to the side, persists it, and only then swaps it in, so a
/// failed store write leaves the previous collection untouched.
///
/// Mutations are not serialized here; `WorkflowState` is the single writer.

use crate::{
    error::PersistenceError,
    store::{read_collection, write_collection, DurableStore, WORKFLOWS_KEY},
    workflow::types::WorkflowDefinition,
};
use arc_swap::ArcSwap;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct WorkflowRegistry {
    /// Current collection, in creation order
    workflows: ArcSwap<Vec<WorkflowDefinition>>,

    /// Mirror of the collection for reload recovery
    store: Arc<dyn DurableStore>,
}

impl WorkflowRegistry {
    /// Create an empty registry writing through to `store`
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self {
            workflows: ArcSwap::new(Arc::new(Vec::new())),
            store,
        }
    }

    /// Read the stored collection without touching the in-memory one
    pub async fn read_stored(&self) -> Result<Vec<WorkflowDefinition>, PersistenceError> {
        read_collection(self.store.as_ref(), WORKFLOWS_KEY).await
    }

    /// Replace the in-memory collection with one read by `read_stored`
    pub fn install(&self, workflows: Vec<WorkflowDefinition>) {
        tracing::info!("Loaded {} workflows from durable store", workflows.len());
        self.workflows.store(Arc::new(workflows));
    }

    /// Current collection (lock-free snapshot)
    pub fn list(&self) -> Arc<Vec<WorkflowDefinition>> {
        self.workflows.load_full()
    }

    pub fn get(&self, id: &str) -> Option<WorkflowDefinition> {
        self.workflows.load().iter().find(|w| w.id == id).cloned()
    }

    /// Create or update a workflow
    ///
    /// Only an id that is currently registered selects an update. An empty or
    /// unknown id (including one that was deleted earlier) is discarded and the
    /// definition is created under a fresh id. `updated_at` is stamped either way.
    pub async fn save(
        &self,
        definition: WorkflowDefinition,
    ) -> Result<WorkflowDefinition, PersistenceError> {
        let current = self.workflows.load_full();
        let mut next = (*current).clone();

        let mut saved = definition;
        saved.updated_at = Some(Utc::now());

        let existing = if saved.id.is_empty() {
            None
        } else {
            next.iter().position(|w| w.id == saved.id)
        };

        match existing {
            Some(index) => next[index] = saved.clone(),
            None => {
                if !saved.id.is_empty() {
                    tracing::debug!("Discarding unregistered workflow id: {}", saved.id);
                }
                saved.id = fresh_id(&next);
                next.push(saved.clone());
            }
        }

        write_collection(self.store.as_ref(), WORKFLOWS_KEY, &next).await?;
        self.workflows.store(Arc::new(next));

        if existing.is_some() {
            tracing::info!("Updated workflow: {} ({})", saved.id, saved.name);
        } else {
            tracing::info!("Created workflow: {} ({})", saved.id, saved.name);
        }

        Ok(saved)
    }

    /// Remove a workflow
    ///
    /// Deleting an id that is not registered succeeds; the (unchanged)
    /// collection is still written so the store matches memory afterwards.
    pub async fn delete(&self, id: &str) -> Result<(), PersistenceError> {
        let current = self.workflows.load_full();
        let next: Vec<WorkflowDefinition> =
            current.iter().filter(|w| w.id != id).cloned().collect();
        let removed = next.len() != current.len();

        write_collection(self.store.as_ref(), WORKFLOWS_KEY, &next).await?;
        self.workflows.store(Arc::new(next));

        if removed {
            tracing::info!("Deleted workflow: {}", id);
        } else {
            tracing::debug!("Delete of unknown workflow is a no-op: {}", id);
        }

        Ok(())
    }
}

/// Generate an id not used by any workflow in `workflows`
fn fresh_id(workflows: &[WorkflowDefinition]) -> String {
    loop {
        let candidate = Uuid::new_v4().to_string();
        if workflows.iter().all(|w| w.id != candidate) {
            return candidate;
        }
    }
}
