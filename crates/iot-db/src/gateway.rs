//! Storage gateway trait

use crate::error::DbResult;
use crate::sql::{quote_identifier, validate_identifier};
use iot_core::{Cell, FieldMap};

/// Relational store used by the importers and the query runner.
///
/// Writes run inside an implicit transaction that stays open until
/// [`commit`](Gateway::commit) or [`rollback`](Gateway::rollback).
/// Every operation fails with `PreconditionError` when no connection is open,
/// except `commit` and `rollback` which are then no-ops.
pub trait Gateway {
    /// Insert one row. With a `conflict_key`, a duplicate key is silently
    /// ignored; without one it surfaces as `StorageError`.
    ///
    /// An empty `fields` mapping is logged and skipped. Returns affected rows.
    fn insert(&mut self, table: &str, fields: &FieldMap, conflict_key: Option<&str>)
        -> DbResult<usize>;

    /// Execute a statement that returns no rows.
    fn execute_raw(&mut self, sql: &str, params: &[Cell]) -> DbResult<usize>;

    /// Execute a query and return its first row, if any.
    fn fetch_one(&self, sql: &str, params: &[Cell]) -> DbResult<Option<Vec<Cell>>>;

    /// Execute a query and return all rows.
    fn fetch_all(&self, sql: &str, params: &[Cell]) -> DbResult<Vec<Vec<Cell>>>;

    /// Commit the pending transaction.
    fn commit(&mut self) -> DbResult<()>;

    /// Discard the pending transaction.
    fn rollback(&mut self) -> DbResult<()>;

    /// Whether a row with `key` in `key_column` exists in `table`.
    fn exists(&self, table: &str, key_column: &str, key: &Cell) -> DbResult<bool> {
        validate_identifier(table)?;
        validate_identifier(key_column)?;
        let sql = format!(
            "SELECT 1 FROM {} WHERE {} = ? LIMIT 1",
            quote_identifier(table),
            quote_identifier(key_column)
        );
        Ok(self
            .fetch_one(&sql, std::slice::from_ref(key))?
            .is_some())
    }
}
