/// Errors from project store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored project decoded but violates a structural invariant.
    #[error("corrupt project {id}: {reason}")]
    CorruptProject { id: String, reason: String },

    /// A lock guarding in-memory state was poisoned.
    #[error("store lock poisoned: {0}")]
    Lock(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
