//! Tests for the DuckDB gateway: connection lifecycle, schema setup, inserts,
//! implicit transactions and constraint enforcement.

use super::*;
use std::str::FromStr;

// ── Helpers ────────────────────────────────────────────────────────────

fn connected() -> DuckDbGateway {
    let mut db = DuckDbGateway::in_memory();
    db.connect().unwrap();
    db
}

fn count(db: &DuckDbGateway, sql: &str) -> i64 {
    match db.fetch_one(sql, &[]).unwrap() {
        Some(row) => match row[0] {
            Cell::Int(n) => n,
            ref other => panic!("expected integer count, got {other:?}"),
        },
        None => panic!("no row for {sql}"),
    }
}

fn location(id: &str, parent: Option<&str>) -> FieldMap {
    FieldMap::new()
        .with("location_id", id)
        .with("parent_location_id", parent)
        .with("location_name", format!("Location {id}"))
}

// ── Connection lifecycle ───────────────────────────────────────────────

#[test]
fn test_connect_creates_pipeline_tables() {
    let db = connected();
    assert!(db.is_connected());
    assert_eq!(count(&db, "SELECT COUNT(*) FROM locations"), 0);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM devices"), 0);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM events"), 0);
}

#[test]
fn test_operations_before_connect_fail_with_precondition_error() {
    let mut db = DuckDbGateway::in_memory();

    let err = db
        .insert("locations", &location("A", None), Some("location_id"))
        .unwrap_err();
    assert!(matches!(err, DbError::PreconditionError { operation: "insert" }));

    assert!(matches!(
        db.fetch_all("SELECT 1", &[]),
        Err(DbError::PreconditionError { .. })
    ));
    assert!(matches!(
        db.execute_raw("SELECT 1", &[]),
        Err(DbError::PreconditionError { .. })
    ));
}

#[test]
fn test_commit_and_rollback_without_connection_are_noops() {
    let mut db = DuckDbGateway::in_memory();
    db.commit().unwrap();
    db.rollback().unwrap();
}

#[test]
fn test_close_is_idempotent() {
    let mut db = connected();
    db.close().unwrap();
    db.close().unwrap();
    assert!(!db.is_connected());
    assert!(matches!(
        db.fetch_one("SELECT 1", &[]),
        Err(DbError::PreconditionError { .. })
    ));
}

#[test]
fn test_reopening_file_database_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("iot.duckdb");
    let config = DatabaseConfig {
        path: path.display().to_string(),
    };

    {
        let mut db = DuckDbGateway::new(config.clone());
        db.connect().unwrap();
        db.insert("locations", &location("A", None), Some("location_id"))
            .unwrap();
        db.commit().unwrap();
        db.close().unwrap();
    }
    assert!(path.exists());

    let mut db = DuckDbGateway::new(config);
    db.connect().unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM locations"), 1);
}

#[test]
fn test_connect_to_unwritable_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut db = DuckDbGateway::new(DatabaseConfig {
        path: dir
            .path()
            .join("missing")
            .join("nested")
            .join("iot.duckdb")
            .display()
            .to_string(),
    });
    assert!(matches!(db.connect(), Err(DbError::ConnectionError(_))));
}

// ── Inserts ────────────────────────────────────────────────────────────

#[test]
fn test_conflict_key_ignores_duplicates() {
    let mut db = connected();
    db.insert("locations", &location("A", None), Some("location_id"))
        .unwrap();
    db.insert("locations", &location("A", None), Some("location_id"))
        .unwrap();
    db.commit().unwrap();

    assert_eq!(count(&db, "SELECT COUNT(*) FROM locations"), 1);
}

#[test]
fn test_duplicate_without_conflict_key_is_storage_error() {
    let mut db = connected();
    db.insert("locations", &location("A", None), None).unwrap();
    let err = db
        .insert("locations", &location("A", None), None)
        .unwrap_err();
    assert!(matches!(err, DbError::StorageError(_)));
}

#[test]
fn test_empty_fields_are_a_noop() {
    let mut db = connected();
    assert_eq!(db.insert("locations", &FieldMap::new(), None).unwrap(), 0);
    assert_eq!(count(&db, "SELECT COUNT(*) FROM locations"), 0);
}

#[test]
fn test_child_before_parent_violates_foreign_key() {
    let mut db = connected();
    let err = db
        .insert("locations", &location("B", Some("A")), Some("location_id"))
        .unwrap_err();
    assert!(matches!(err, DbError::StorageError(_)));
}

#[test]
fn test_parent_inserted_in_same_transaction_satisfies_foreign_key() {
    let mut db = connected();
    db.insert("locations", &location("A", None), Some("location_id"))
        .unwrap();
    db.insert("locations", &location("B", Some("A")), Some("location_id"))
        .unwrap();
    db.commit().unwrap();

    let rows = db
        .fetch_all(
            "SELECT location_id, parent_location_id FROM locations ORDER BY location_id",
            &[],
        )
        .unwrap();
    assert_eq!(
        rows,
        vec![
            vec![Cell::Text("A".into()), Cell::Null],
            vec![Cell::Text("B".into()), Cell::Text("A".into())],
        ]
    );
}

#[test]
fn test_rollback_discards_uncommitted_rows() {
    let mut db = connected();
    db.insert("locations", &location("A", None), Some("location_id"))
        .unwrap();
    db.rollback().unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM locations"), 0);

    // a fresh transaction opens on the next write
    db.insert("locations", &location("B", None), Some("location_id"))
        .unwrap();
    db.commit().unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM locations"), 1);
}

#[test]
fn test_close_discards_uncommitted_rows() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        path: dir.path().join("iot.duckdb").display().to_string(),
    };

    let mut db = DuckDbGateway::new(config.clone());
    db.connect().unwrap();
    db.insert("locations", &location("A", None), Some("location_id"))
        .unwrap();
    db.close().unwrap();

    let mut db = DuckDbGateway::new(config);
    db.connect().unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM locations"), 0);
}

#[test]
fn test_event_details_are_queryable_as_json() {
    let mut db = connected();
    db.insert("locations", &location("A", None), Some("location_id"))
        .unwrap();
    db.insert(
        "devices",
        &FieldMap::new()
            .with("device_id", "D1")
            .with("device_type", "Smart Lamp")
            .with("device_name", "Lamp")
            .with("location_id", "A"),
        Some("device_id"),
    )
    .unwrap();
    db.insert(
        "events",
        &FieldMap::new()
            .with("event_id", "E1")
            .with("device_id", "D1")
            .with("timestamp", "2024-01-15 08:30:00")
            .with("details", r#"{"brightness":85,"new_status":"on"}"#),
        Some("event_id"),
    )
    .unwrap();
    db.commit().unwrap();

    let row = db
        .fetch_one(
            "SELECT CAST((details->>'brightness') AS INTEGER), (details->>'new_status'), \"timestamp\" FROM events",
            &[],
        )
        .unwrap()
        .unwrap();
    assert_eq!(row[0], Cell::Int(85));
    assert_eq!(row[1], Cell::Text("on".into()));
    assert_eq!(row[2], Cell::Text("2024-01-15T08:30:00".into()));
}

// ── Queries ────────────────────────────────────────────────────────────

#[test]
fn test_fetch_binds_parameters() {
    let mut db = connected();
    db.insert("locations", &location("A", None), Some("location_id"))
        .unwrap();
    let row = db
        .fetch_one(
            "SELECT location_name FROM locations WHERE location_id = ?",
            &[Cell::from("A")],
        )
        .unwrap();
    assert_eq!(row, Some(vec![Cell::Text("Location A".into())]));
    assert_eq!(
        db.fetch_one(
            "SELECT location_name FROM locations WHERE location_id = ?",
            &[Cell::from("Z")]
        )
        .unwrap(),
        None
    );
}

#[test]
fn test_exists_checks_key_presence() {
    let mut db = connected();
    db.insert("locations", &location("A", None), Some("location_id"))
        .unwrap();
    assert!(db.exists("locations", "location_id", &Cell::from("A")).unwrap());
    assert!(!db.exists("locations", "location_id", &Cell::from("B")).unwrap());
    assert!(matches!(
        db.exists("locations; --", "location_id", &Cell::from("A")),
        Err(DbError::InvalidIdentifier(_))
    ));
}

#[test]
fn test_malformed_sql_is_storage_error() {
    let mut db = connected();
    assert!(matches!(
        db.fetch_all("SELECTTTT garbage", &[]),
        Err(DbError::StorageError(_))
    ));
    assert!(matches!(
        db.execute_raw("INSERT INTO nowhere VALUES (1)", &[]),
        Err(DbError::StorageError(_))
    ));
}

#[test]
fn test_decimal_values_round_trip() {
    let db = connected();
    let row = db
        .fetch_one("SELECT CAST(75.5 AS DECIMAL(5, 1))", &[])
        .unwrap()
        .unwrap();
    assert_eq!(
        row[0],
        Cell::Decimal(rust_decimal::Decimal::from_str("75.5").unwrap())
    );
}

#[test]
fn test_execute_raw_writes_inside_the_pending_transaction() {
    let mut db = connected();
    db.execute_raw(
        "INSERT INTO locations (location_id, location_name) VALUES (?, ?)",
        &[Cell::from("A"), Cell::from("Root")],
    )
    .unwrap();
    db.rollback().unwrap();
    assert_eq!(count(&db, "SELECT COUNT(*) FROM locations"), 0);
}
