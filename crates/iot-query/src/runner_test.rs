use super::*;
use iot_core::Cell;
use iot_db::test_utils::MemoryGateway;
use iot_db::DbError;
use serde_json::json;

const A: QueryDef = QueryDef {
    name: "a",
    sql: "SELECT 1",
    columns: &["x"],
};

const B: QueryDef = QueryDef {
    name: "b",
    sql: "SELECT 2, 3",
    columns: &["x", "y"],
};

#[test]
fn test_rows_are_zipped_with_columns_per_query() {
    let gw = MemoryGateway::new()
        .with_query_result("SELECT 1", vec![vec![Cell::Int(1)]])
        .with_query_result("SELECT 2, 3", vec![vec![Cell::Int(2), Cell::Int(3)]]);

    let results = run_queries(&gw, &[A, B]).unwrap();

    assert_eq!(
        serde_json::to_value(&results).unwrap(),
        json!({"a": [{"x": 1}], "b": [{"x": 2, "y": 3}]})
    );
    assert_eq!(results.names().collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn test_empty_result_is_kept() {
    let gw = MemoryGateway::new().with_query_result("SELECT 1", vec![]);
    let results = run_queries(&gw, &[A]).unwrap();
    assert_eq!(results.get("a"), Some(&[][..]));
}

#[test]
fn test_failing_query_is_named_in_error() {
    let gw = MemoryGateway::new().with_query_result("SELECT 1", vec![vec![Cell::Int(1)]]);

    let err = run_queries(&gw, &[A, B]).unwrap_err();

    match err {
        QueryError::Execution { query, source } => {
            assert_eq!(query, "b");
            assert!(matches!(source, DbError::StorageError(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_against_duckdb() {
    let mut db = iot_db::DuckDbGateway::in_memory();
    db.connect().unwrap();

    let results = run_queries(&db, &[A, B]).unwrap();

    assert_eq!(
        serde_json::to_value(&results).unwrap(),
        json!({"a": [{"x": 1}], "b": [{"x": 2, "y": 3}]})
    );
}
