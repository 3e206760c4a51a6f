/// Capped execution audit log
///
/// Newest-first, at most `MAX_LOG_ENTRIES` entries. Every append puts the new
/// entry at the head, drops whatever falls past the cap, persists the result
/// and only then publishes it. Entries are never modified after creation.

use crate::{
    error::PersistenceError,
    store::{read_collection, write_collection, DurableStore, WEBHOOK_LOGS_KEY},
};
use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Upper bound on retained audit entries
pub const MAX_LOG_ENTRIES: usize = 100;

/// Name recorded when the executed workflow id did not resolve
pub const UNKNOWN_WORKFLOW_NAME: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Error,
}

/// Immutable record of one execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    /// May point at a workflow that has since been deleted
    pub workflow_id: String,
    /// Name at execution time; not updated on rename
    pub workflow_name: String,
    pub timestamp: DateTime<Utc>,
    pub payload: Value,
    pub status: ExecutionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditLogEntry {
    pub fn success(
        workflow_id: impl Into<String>,
        workflow_name: impl Into<String>,
        payload: Value,
        response: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            workflow_id: workflow_id.into(),
            workflow_name: workflow_name.into(),
            timestamp: Utc::now(),
            payload,
            status: ExecutionStatus::Success,
            response: Some(response),
            error: None,
        }
    }

    pub fn failure(
        workflow_id: impl Into<String>,
        workflow_name: impl Into<String>,
        payload: Value,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            workflow_id: workflow_id.into(),
            workflow_name: workflow_name.into(),
            timestamp: Utc::now(),
            payload,
            status: ExecutionStatus::Error,
            response: None,
            error: Some(message.into()),
        }
    }
}

pub struct AuditLog {
    entries: ArcSwap<Vec<AuditLogEntry>>,
    store: Arc<dyn DurableStore>,
}

impl AuditLog {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self {
            entries: ArcSwap::new(Arc::new(Vec::new())),
            store,
        }
    }

    /// Read the stored log, truncated to the cap, without touching the in-memory one
    pub async fn read_stored(&self) -> Result<Vec<AuditLogEntry>, PersistenceError> {
        let mut stored: Vec<AuditLogEntry> =
            read_collection(self.store.as_ref(), WEBHOOK_LOGS_KEY).await?;
        if stored.len() > MAX_LOG_ENTRIES {
            tracing::warn!(
                "Stored audit log holds {} entries, keeping newest {}",
                stored.len(),
                MAX_LOG_ENTRIES
            );
            stored.truncate(MAX_LOG_ENTRIES);
        }
        Ok(stored)
    }

    /// Replace the in-memory log with one read by `read_stored`
    pub fn install(&self, entries: Vec<AuditLogEntry>) {
        tracing::info!("Loaded {} audit log entries from durable store", entries.len());
        self.entries.store(Arc::new(entries));
    }

    /// Current entries, newest first
    pub fn list(&self) -> Arc<Vec<AuditLogEntry>> {
        self.entries.load_full()
    }

    pub fn list_by_status(&self, status: ExecutionStatus) -> Vec<AuditLogEntry> {
        self.entries
            .load()
            .iter()
            .filter(|entry| entry.status == status)
            .cloned()
            .collect()
    }

    /// Prepend `entry`, evict past the cap, persist, then publish
    ///
    /// Order is append order; timestamps are never compared, so two entries
    /// stamped within the same clock tick keep the later append first.
    pub async fn append(&self, entry: AuditLogEntry) -> Result<(), PersistenceError> {
        let current = self.entries.load_full();

        let mut next = Vec::with_capacity(MAX_LOG_ENTRIES);
        next.push(entry);
        next.extend(current.iter().take(MAX_LOG_ENTRIES - 1).cloned());

        write_collection(self.store.as_ref(), WEBHOOK_LOGS_KEY, &next).await?;
        self.entries.store(Arc::new(next));

        Ok(())
    }
}
