//! Error types for iot-import

use iot_core::EntityKind;
use iot_db::DbError;
use thiserror::Error;

/// Importer errors
#[derive(Error, Debug)]
pub enum ImportError {
    /// The store rejected a record; the batch was rolled back (I001)
    #[error("[I001] Failed to import {entity} '{record_id}': {source}")]
    Insert {
        entity: EntityKind,
        record_id: String,
        #[source]
        source: DbError,
    },

    /// Resolving missing parents against the store failed (I002)
    #[error("[I002] Failed to look up parent location '{parent_id}': {source}")]
    ParentLookup {
        parent_id: String,
        #[source]
        source: DbError,
    },

    /// The batch could not be committed (I003)
    #[error("[I003] Failed to commit {entity} import: {source}")]
    Commit {
        entity: EntityKind,
        #[source]
        source: DbError,
    },
}

/// Result type alias for ImportError
pub type ImportResult<T> = Result<T, ImportError>;

impl ImportError {
    /// The underlying storage error.
    pub fn db_error(&self) -> &DbError {
        match self {
            ImportError::Insert { source, .. }
            | ImportError::ParentLookup { source, .. }
            | ImportError::Commit { source, .. } => source,
        }
    }
}
