//! Error types for iot-db

use thiserror::Error;

/// Storage gateway errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Backend unreachable or rejected the connection (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Operation invoked before `connect()` (D002)
    #[error("[D002] Database connection not established: call connect() before {operation}")]
    PreconditionError { operation: &'static str },

    /// Statement rejected by the backend (D003)
    #[error("[D003] SQL execution failed: {0}")]
    StorageError(String),

    /// Pipeline tables could not be created (D004)
    #[error("[D004] Schema setup failed: {0}")]
    SchemaError(String),

    /// Table or column name that cannot be safely interpolated (D005)
    #[error("[D005] Invalid identifier '{0}': must contain only alphanumeric characters and underscores")]
    InvalidIdentifier(String),

    /// Transaction boundary failed (D006)
    #[error("[D006] Transaction failed: {0}")]
    TransactionError(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::StorageError(err.to_string())
    }
}
