//! Row-shaped values exchanged between transformers, the storage gateway and
//! the query runner.
//!
//! [`Cell`] is a single column value and [`FieldMap`] an ordered
//! column-name -> value mapping. Both serialize the way exporters need them:
//! decimals become plain floats and maps keep their column order.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// A single column value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// SQL `NULL` or an absent JSON field
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Any integer width that fits in 64 bits
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Exact numeric value (`DECIMAL` / `NUMERIC`)
    Decimal(Decimal),
    /// Text, including timestamps and serialized JSON
    Text(String),
}

impl Cell {
    /// Returns `true` for [`Cell::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Canonical string form used for identifier comparisons.
    ///
    /// Numeric and textual identifiers compare equal when they print the same,
    /// so `5` and `"5"` normalize to the same key. `Null` has no key.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Numeric value as `f64`, coercing decimals.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(n) => Some(*n as f64),
            Cell::Float(f) => Some(*f),
            Cell::Decimal(d) => d.to_f64(),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Int(n) => write!(f, "{n}"),
            Cell::Float(x) => write!(f, "{x}"),
            Cell::Decimal(d) => write!(f, "{d}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<&serde_json::Value> for Cell {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Cell::Null,
            serde_json::Value::Bool(b) => Cell::Bool(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Int(i),
                None => n.as_f64().map_or(Cell::Null, Cell::Float),
            },
            serde_json::Value::String(s) => Cell::Text(s.clone()),
            nested @ (serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Cell::Text(nested.to_string())
            }
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Cell::Decimal(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Null, Into::into)
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Null => serializer.serialize_none(),
            Cell::Bool(b) => serializer.serialize_bool(*b),
            Cell::Int(n) => serializer.serialize_i64(*n),
            Cell::Float(f) => serializer.serialize_f64(*f),
            // JSON has no decimal type
            Cell::Decimal(d) => match d.to_f64() {
                Some(f) => serializer.serialize_f64(f),
                None => serializer.serialize_str(&d.to_string()),
            },
            Cell::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Ordered column-name -> value mapping.
///
/// Used both as the output of an entity transformer (columns to insert) and
/// as one named result row of a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, Cell)>,
}

impl FieldMap {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `column` to `value`, replacing an existing entry in place.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Cell>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Cell>) -> Self {
        self.insert(column, value);
        self
    }

    /// Look up a column value.
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Values in column order.
    pub fn values(&self) -> impl Iterator<Item = &Cell> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// Iterate `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Zip an ordered column list with a positional row.
    ///
    /// Extra columns or extra values are dropped, mirroring a plain zip.
    pub fn zip<S: AsRef<str>>(columns: &[S], row: Vec<Cell>) -> Self {
        Self {
            entries: columns
                .iter()
                .map(|c| c.as_ref().to_string())
                .zip(row)
                .collect(),
        }
    }
}

impl Serialize for FieldMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;
