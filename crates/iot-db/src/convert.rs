//! Conversions between gateway [`Cell`] values and DuckDB values.

use duckdb::types::{TimeUnit, Value};
use iot_core::Cell;

/// Bindable DuckDB value for a cell.
pub fn to_duckdb_value(cell: &Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Bool(b) => Value::Boolean(*b),
        Cell::Int(n) => Value::BigInt(*n),
        Cell::Float(f) => Value::Double(*f),
        Cell::Decimal(d) => Value::Decimal(*d),
        Cell::Text(s) => Value::Text(s.clone()),
    }
}

/// Read a DuckDB value into a cell.
///
/// Integer widths collapse to `Int` (falling back to text when they do not
/// fit in 64 bits), temporal values become ISO-8601 text, and anything else
/// uses its debug rendering.
pub fn from_duckdb_value(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::Boolean(b) => Cell::Bool(b),
        Value::TinyInt(n) => Cell::Int(n.into()),
        Value::SmallInt(n) => Cell::Int(n.into()),
        Value::Int(n) => Cell::Int(n.into()),
        Value::BigInt(n) => Cell::Int(n),
        Value::HugeInt(n) => i64::try_from(n).map_or_else(|_| Cell::Text(n.to_string()), Cell::Int),
        Value::UTinyInt(n) => Cell::Int(n.into()),
        Value::USmallInt(n) => Cell::Int(n.into()),
        Value::UInt(n) => Cell::Int(n.into()),
        Value::UBigInt(n) => i64::try_from(n).map_or_else(|_| Cell::Text(n.to_string()), Cell::Int),
        Value::Float(f) => Cell::Float(f.into()),
        Value::Double(f) => Cell::Float(f),
        Value::Decimal(d) => Cell::Decimal(d),
        Value::Text(s) => Cell::Text(s),
        Value::Timestamp(unit, raw) => timestamp_cell(unit, raw),
        Value::Date32(days) => date_cell(days),
        other => Cell::Text(format!("{other:?}")),
    }
}

fn timestamp_cell(unit: TimeUnit, raw: i64) -> Cell {
    let micros = match unit {
        TimeUnit::Second => raw.saturating_mul(1_000_000),
        TimeUnit::Millisecond => raw.saturating_mul(1_000),
        TimeUnit::Microsecond => raw,
        TimeUnit::Nanosecond => raw / 1_000,
    };
    let secs = micros.div_euclid(1_000_000);
    let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    match chrono::DateTime::from_timestamp(secs, nanos) {
        Some(ts) => Cell::Text(ts.naive_utc().format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        None => Cell::Int(raw),
    }
}

fn date_cell(days: i32) -> Cell {
    chrono::NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days.into())))
        .map_or(Cell::Int(days.into()), |date| Cell::Text(date.to_string()))
}
