//! Pipeline tables, created on connect.
//!
//! Every statement in `schema.sql` is `CREATE TABLE IF NOT EXISTS`, so a file
//! database from an earlier run is reused as is.

use crate::error::{DbError, DbResult};
use duckdb::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Tables the importers and queries rely on, in foreign-key order.
pub const TABLES: [&str; 3] = ["locations", "devices", "events"];

/// Create any missing pipeline table and check that all of them exist.
pub fn apply_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)
        .map_err(|e| DbError::SchemaError(e.to_string()))?;

    let missing: Vec<&str> = TABLES
        .iter()
        .copied()
        .filter(|table| !table_exists(conn, table).unwrap_or(false))
        .collect();
    if !missing.is_empty() {
        return Err(DbError::SchemaError(format!(
            "tables missing after setup: {}",
            missing.join(", ")
        )));
    }
    log::debug!("Pipeline schema ready ({})", TABLES.join(", "));
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM information_schema.tables WHERE table_name = ?",
        [table],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn.execute(
            "INSERT INTO locations (location_id, location_name) VALUES ('A', 'House')",
            [],
        )
        .unwrap();

        apply_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        for table in TABLES {
            assert!(table_exists(&conn, table).unwrap(), "{table} missing");
        }
    }

    #[test]
    fn test_table_exists_false_for_unknown_table() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!table_exists(&conn, "schema_version").unwrap());
    }
}
