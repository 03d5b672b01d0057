/// Storage-layer errors for SQLite operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    Sqlite { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("connection lock poisoned: {message}")]
    LockPoisoned { message: String },

    #[error("corrupt embedding blob for content hash {content_hash}: {details}")]
    CorruptEmbedding {
        content_hash: String,
        details: String,
    },

    #[error("pattern {id} not found")]
    PatternNotFound { id: String },
}
