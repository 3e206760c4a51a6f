/// Error taxonomy for the registry, audit log and execution path
///
/// Store failures are always surfaced to the caller. A missing workflow during
/// execution is an expected condition and is folded into the execution outcome.

use thiserror::Error;

/// The durable store rejected a read or write, or a blob could not be (de)serialized.
///
/// Any mutation that hits this error is aborted and the in-memory state keeps
/// its last known-good snapshot.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// SQLite backend failure (connection, query, quota)
    #[error("durable store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Collection could not be encoded or a stored blob is corrupt
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store refused to accept a write for the given key
    #[error("durable store rejected write to '{0}'")]
    Rejected(String),

    /// The task running the mutation panicked before it could report back
    #[error("mutation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Failures detected by the execution engine itself.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("workflow not found")]
    NotFound(String),
}

/// Caller-supplied data failed a precondition before reaching the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("workflow name must not be empty")]
    EmptyName,
}
