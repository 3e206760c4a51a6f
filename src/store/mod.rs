/// Durable Store layer
///
/// A key-value persistence surface holding two independent collections as
/// serialized text blobs. The store knows nothing about workflows or logs:
/// callers hand it whole collections and read whole collections back.
/// Writes are whole-value overwrites (last writer wins).

// SQLite-backed store for production runs
pub mod sqlite;

// In-memory store for tests and ephemeral runs
pub mod memory;

use crate::error::PersistenceError;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key holding the serialized workflow definitions
pub const WORKFLOWS_KEY: &str = "workflows";

/// Key holding the serialized audit log, newest first
pub const WEBHOOK_LOGS_KEY: &str = "webhook-logs";

/// Text blob persistence scoped to the local device
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Read the blob stored under `key`, `None` if nothing was ever written
    async fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the blob stored under `key`
    async fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// Load a whole collection. A missing key is an empty collection.
pub async fn read_collection<T: DeserializeOwned>(
    store: &dyn DurableStore,
    key: &str,
) -> Result<Vec<T>, PersistenceError> {
    match store.read(key).await? {
        Some(blob) => Ok(serde_json::from_str(&blob)?),
        None => Ok(Vec::new()),
    }
}

/// Serialize and overwrite a whole collection.
pub async fn write_collection<T: Serialize>(
    store: &dyn DurableStore,
    key: &str,
    items: &[T],
) -> Result<(), PersistenceError> {
    let blob = serde_json::to_string(items)?;
    store.write(key, &blob).await
}
