//! SQL statement builders for parameterized writes.

use crate::error::{DbError, DbResult};
use iot_core::FieldMap;

/// Reject identifiers that are not plain `[A-Za-z0-9_]+` names.
pub fn validate_identifier(name: &str) -> DbResult<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DbError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

/// Double-quote an identifier that already passed [`validate_identifier`].
pub fn quote_identifier(name: &str) -> String {
    format!("\"{name}\"")
}

/// Build `INSERT INTO t (cols) VALUES (?, ...) [ON CONFLICT (key) DO NOTHING]`.
///
/// Column order follows `fields`; values are bound positionally by the caller.
pub fn build_insert(table: &str, fields: &FieldMap, conflict_key: Option<&str>) -> DbResult<String> {
    validate_identifier(table)?;
    let columns = fields
        .columns()
        .map(|column| validate_identifier(column).map(|()| quote_identifier(column)))
        .collect::<DbResult<Vec<_>>>()?;
    let placeholders = vec!["?"; columns.len()].join(", ");

    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table),
        columns.join(", "),
        placeholders
    );

    if let Some(key) = conflict_key {
        validate_identifier(key)?;
        sql.push_str(&format!(" ON CONFLICT ({}) DO NOTHING", quote_identifier(key)));
    }
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iot_core::Cell;

    #[test]
    fn test_build_insert_with_conflict_key() {
        let fields = FieldMap::new()
            .with("device_id", "D1")
            .with("location_id", Cell::Null);
        let sql = build_insert("devices", &fields, Some("device_id")).unwrap();
        assert_eq!(
            sql,
            r#"INSERT INTO "devices" ("device_id", "location_id") VALUES (?, ?) ON CONFLICT ("device_id") DO NOTHING"#
        );
    }

    #[test]
    fn test_build_insert_without_conflict_key() {
        let fields = FieldMap::new().with("timestamp", "2024-01-01 00:00:00");
        let sql = build_insert("events", &fields, None).unwrap();
        assert_eq!(sql, r#"INSERT INTO "events" ("timestamp") VALUES (?)"#);
    }

    #[test]
    fn test_invalid_identifiers_rejected() {
        let fields = FieldMap::new().with("id; DROP TABLE x", 1_i64);
        assert!(matches!(
            build_insert("devices", &fields, None),
            Err(DbError::InvalidIdentifier(_))
        ));
        assert!(validate_identifier("").is_err());
        assert!(validate_identifier("locations").is_ok());
    }
}
