//! Error types for iot-query

use iot_db::DbError;
use thiserror::Error;

/// Query and export errors
#[derive(Error, Debug)]
pub enum QueryError {
    /// A catalog query failed to execute (Q001)
    #[error("[Q001] Query '{query}' failed: {source}")]
    Execution {
        query: String,
        #[source]
        source: DbError,
    },

    /// Results could not be rendered in the output format (Q002)
    #[error("[Q002] Failed to serialize results as {format}: {message}")]
    Serialize {
        format: &'static str,
        message: String,
    },

    /// Output file could not be written (Q003)
    #[error("[Q003] Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for QueryError
pub type QueryResult<T> = Result<T, QueryError>;
