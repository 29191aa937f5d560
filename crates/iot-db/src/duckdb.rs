//! DuckDB storage gateway implementation

use crate::convert::{from_duckdb_value, to_duckdb_value};
use crate::error::{DbError, DbResult};
use crate::gateway::Gateway;
use crate::schema::apply_schema;
use crate::sql::build_insert;
use duckdb::types::Value;
use duckdb::{params_from_iter, Connection};
use iot_core::{Cell, DatabaseConfig, FieldMap};
use std::path::Path;

/// DuckDB-backed [`Gateway`].
///
/// Single-threaded: one run, one connection, no `Mutex`. The connection is
/// opened by [`connect`](Self::connect) and released by
/// [`close`](Self::close) or on drop, discarding any uncommitted writes.
pub struct DuckDbGateway {
    config: DatabaseConfig,
    conn: Option<Connection>,
    in_transaction: bool,
}

impl DuckDbGateway {
    /// Create a gateway for `config` without opening a connection.
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            conn: None,
            in_transaction: false,
        }
    }

    /// Create a gateway for a transient in-memory database.
    pub fn in_memory() -> Self {
        Self::new(DatabaseConfig::default())
    }

    /// Open the connection and create any missing pipeline table.
    ///
    /// Calling `connect` on an open gateway is a no-op.
    pub fn connect(&mut self) -> DbResult<()> {
        if self.conn.is_some() {
            return Ok(());
        }

        let conn = if self.config.is_in_memory() {
            Connection::open_in_memory()
        } else {
            Connection::open(Path::new(&self.config.path))
        }
        .map_err(|e| {
            log::error!("Failed to connect to database: {e}");
            DbError::ConnectionError(format!("{e}: {}", self.config.path))
        })?;

        apply_schema(&conn)?;
        log::info!(
            "Database connection established successfully ({})",
            self.config.path
        );
        self.conn = Some(conn);
        Ok(())
    }

    /// Whether [`connect`](Self::connect) has been called and not yet closed.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Release the connection. Idempotent.
    pub fn close(&mut self) -> DbResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };

        if self.in_transaction {
            log::warn!("Closing connection with an open transaction; uncommitted changes are discarded");
            let _ = conn.execute_batch("ROLLBACK");
            self.in_transaction = false;
        }

        conn.close().map_err(|(_, e)| {
            log::error!("Failed to close connection: {e}");
            DbError::ConnectionError(format!("close failed: {e}"))
        })?;
        log::info!("Database connection closed.");
        Ok(())
    }

    fn connection(&self, operation: &'static str) -> DbResult<&Connection> {
        self.conn
            .as_ref()
            .ok_or(DbError::PreconditionError { operation })
    }

    /// Borrow the connection for a write, opening the implicit transaction.
    fn write_connection(&mut self, operation: &'static str) -> DbResult<&Connection> {
        let conn = self
            .conn
            .as_ref()
            .ok_or(DbError::PreconditionError { operation })?;
        if !self.in_transaction {
            conn.execute_batch("BEGIN TRANSACTION")
                .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;
            self.in_transaction = true;
        }
        Ok(conn)
    }

    fn query_rows(&self, operation: &'static str, sql: &str, params: &[Cell]) -> DbResult<Vec<Vec<Cell>>> {
        let conn = self.connection(operation)?;
        let values: Vec<Value> = params.iter().map(to_duckdb_value).collect();

        let mut stmt = conn.prepare(sql).map_err(|e| {
            log::error!("Failed to fetch data: {e}");
            DbError::StorageError(format!("prepare failed: {e}"))
        })?;

        // Column count is read per row; the statement reports none before execution.
        let rows = stmt
            .query_map(params_from_iter(values), |row| {
                let col_count = row.as_ref().column_count();
                (0..col_count)
                    .map(|i| row.get::<_, Value>(i).map(from_duckdb_value))
                    .collect::<Result<Vec<_>, _>>()
            })
            .and_then(|mapped| mapped.collect::<Result<Vec<_>, _>>())
            .map_err(|e| {
                log::error!("Failed to fetch data: {e}");
                DbError::StorageError(format!("query failed: {e}"))
            })?;

        log::debug!("Fetched {} rows for query: {sql}", rows.len());
        Ok(rows)
    }
}

impl Gateway for DuckDbGateway {
    fn insert(
        &mut self,
        table: &str,
        fields: &FieldMap,
        conflict_key: Option<&str>,
    ) -> DbResult<usize> {
        self.connection("insert")?;
        if fields.is_empty() {
            log::warn!("Attempted to insert empty data into {table}");
            return Ok(0);
        }

        let sql = build_insert(table, fields, conflict_key)?;
        let values: Vec<Value> = fields.values().map(to_duckdb_value).collect();
        let conn = self.write_connection("insert")?;

        let affected = conn
            .execute(&sql, params_from_iter(values))
            .map_err(|e| {
                log::error!("Failed to insert into {table}: {e}");
                DbError::StorageError(format!("insert into {table}: {e}"))
            })?;
        log::debug!("Inserted data into {table}: {fields:?}");
        Ok(affected)
    }

    fn execute_raw(&mut self, sql: &str, params: &[Cell]) -> DbResult<usize> {
        let values: Vec<Value> = params.iter().map(to_duckdb_value).collect();
        let conn = self.write_connection("execute_raw")?;
        let affected = conn.execute(sql, params_from_iter(values)).map_err(|e| {
            log::error!("Failed to execute query: {e}");
            DbError::StorageError(format!("{e}: {sql}"))
        })?;
        log::debug!("Executed query: {sql}");
        Ok(affected)
    }

    fn fetch_one(&self, sql: &str, params: &[Cell]) -> DbResult<Option<Vec<Cell>>> {
        Ok(self
            .query_rows("fetch_one", sql, params)?
            .into_iter()
            .next())
    }

    fn fetch_all(&self, sql: &str, params: &[Cell]) -> DbResult<Vec<Vec<Cell>>> {
        self.query_rows("fetch_all", sql, params)
    }

    fn commit(&mut self) -> DbResult<()> {
        let Some(conn) = self.conn.as_ref() else {
            return Ok(());
        };
        if !self.in_transaction {
            return Ok(());
        }

        self.in_transaction = false;
        if let Err(commit_err) = conn.execute_batch("COMMIT") {
            let _ = conn.execute_batch("ROLLBACK");
            log::error!("Failed to commit transaction: {commit_err}");
            return Err(DbError::TransactionError(format!(
                "COMMIT failed: {commit_err}"
            )));
        }
        log::debug!("Transaction committed successfully.");
        Ok(())
    }

    fn rollback(&mut self) -> DbResult<()> {
        let Some(conn) = self.conn.as_ref() else {
            return Ok(());
        };
        if !self.in_transaction {
            return Ok(());
        }

        self.in_transaction = false;
        conn.execute_batch("ROLLBACK").map_err(|e| {
            log::error!("Failed to rollback transaction: {e}");
            DbError::TransactionError(format!("ROLLBACK failed: {e}"))
        })?;
        log::warn!("Transaction rolled back.");
        Ok(())
    }
}

impl Drop for DuckDbGateway {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::warn!("Failed to release database connection: {e}");
        }
    }
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
