//! In-memory [`Gateway`] test double.
//!
//! Keeps rows per table, honours conflict keys and the foreign keys of the
//! pipeline schema, and applies writes transactionally. Inserts can be made
//! to fail for chosen keys, and `fetch_all` answers from canned results.

use crate::error::{DbError, DbResult};
use crate::gateway::Gateway;
use iot_core::{Cell, FieldMap};
use std::collections::{HashMap, HashSet};

/// Primary key column per table.
const PRIMARY_KEYS: &[(&str, &str)] = &[
    ("locations", "location_id"),
    ("devices", "device_id"),
    ("events", "event_id"),
];

/// `(table, column, referenced table)` foreign keys.
const FOREIGN_KEYS: &[(&str, &str, &str)] = &[
    ("locations", "parent_location_id", "locations"),
    ("devices", "location_id", "locations"),
    ("events", "device_id", "devices"),
];

/// Recording in-memory gateway.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    committed: HashMap<String, Vec<FieldMap>>,
    pending: Vec<(String, FieldMap)>,
    /// Every successful insert as `(table, key)`, in call order, including
    /// rows later rolled back.
    pub insert_log: Vec<(String, String)>,
    fail_keys: HashSet<String>,
    canned: HashMap<String, Vec<Vec<Cell>>>,
    /// Number of commits that had pending rows
    pub commits: usize,
    /// Number of rollbacks that discarded pending rows
    pub rollbacks: usize,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every insert whose key equals `key` fail with `StorageError`.
    pub fn fail_on(mut self, key: impl Into<String>) -> Self {
        self.fail_keys.insert(key.into());
        self
    }

    /// Answer `fetch_all`/`fetch_one` for exactly `sql` with `rows`.
    pub fn with_query_result(mut self, sql: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        self.canned.insert(sql.into(), rows);
        self
    }

    /// Seed a committed row directly.
    pub fn with_row(mut self, table: &str, row: FieldMap) -> Self {
        self.committed.entry(table.to_string()).or_default().push(row);
        self
    }

    /// Committed rows of `table`.
    pub fn rows(&self, table: &str) -> &[FieldMap] {
        self.committed.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Committed keys of `table`, in commit order.
    pub fn keys(&self, table: &str) -> Vec<String> {
        let key_column = primary_key(table);
        self.rows(table)
            .iter()
            .filter_map(|row| row.get(key_column).and_then(Cell::as_key))
            .collect()
    }

    fn key_exists(&self, table: &str, key_column: &str, key: &str) -> bool {
        let matches = |row: &FieldMap| row.get(key_column).and_then(Cell::as_key).as_deref() == Some(key);
        self.rows(table).iter().any(matches)
            || self
                .pending
                .iter()
                .any(|(t, row)| t == table && matches(row))
    }
}

fn primary_key(table: &str) -> &'static str {
    PRIMARY_KEYS
        .iter()
        .find(|(t, _)| *t == table)
        .map_or("id", |(_, key)| *key)
}

impl Gateway for MemoryGateway {
    fn insert(
        &mut self,
        table: &str,
        fields: &FieldMap,
        conflict_key: Option<&str>,
    ) -> DbResult<usize> {
        if fields.is_empty() {
            return Ok(0);
        }

        let pk = primary_key(table);
        let key = fields.get(pk).and_then(Cell::as_key).ok_or_else(|| {
            DbError::StorageError(format!("NOT NULL constraint failed: {table}.{pk}"))
        })?;

        if self.fail_keys.contains(&key) {
            return Err(DbError::StorageError(format!("injected failure for {table} {key}")));
        }

        if self.key_exists(table, pk, &key) {
            return match conflict_key {
                Some(_) => Ok(0),
                None => Err(DbError::StorageError(format!(
                    "duplicate key \"{key}\" violates primary key on {table}"
                ))),
            };
        }

        for (fk_table, column, referenced) in FOREIGN_KEYS {
            if *fk_table != table {
                continue;
            }
            if let Some(parent) = fields.get(column).and_then(Cell::as_key) {
                if !self.key_exists(referenced, primary_key(referenced), &parent) {
                    return Err(DbError::StorageError(format!(
                        "foreign key violation: {table}.{column} = \"{parent}\" not present in {referenced}"
                    )));
                }
            }
        }

        self.pending.push((table.to_string(), fields.clone()));
        self.insert_log.push((table.to_string(), key));
        Ok(1)
    }

    fn execute_raw(&mut self, sql: &str, _params: &[Cell]) -> DbResult<usize> {
        Err(DbError::StorageError(format!(
            "MemoryGateway cannot execute raw SQL: {sql}"
        )))
    }

    fn fetch_one(&self, sql: &str, params: &[Cell]) -> DbResult<Option<Vec<Cell>>> {
        Ok(self.fetch_all(sql, params)?.into_iter().next())
    }

    fn fetch_all(&self, sql: &str, _params: &[Cell]) -> DbResult<Vec<Vec<Cell>>> {
        self.canned
            .get(sql)
            .cloned()
            .ok_or_else(|| DbError::StorageError(format!("no canned result for: {sql}")))
    }

    fn exists(&self, table: &str, key_column: &str, key: &Cell) -> DbResult<bool> {
        Ok(key
            .as_key()
            .is_some_and(|key| self.key_exists(table, key_column, &key)))
    }

    fn commit(&mut self) -> DbResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        for (table, row) in self.pending.drain(..) {
            self.committed.entry(table).or_default().push(row);
        }
        self.commits += 1;
        Ok(())
    }

    fn rollback(&mut self) -> DbResult<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        self.pending.clear();
        self.rollbacks += 1;
        Ok(())
    }
}
