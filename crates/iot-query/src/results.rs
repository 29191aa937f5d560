//! Named query results in execution order

use iot_core::FieldMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Mapping from query name to its result rows.
///
/// Keeps queries in the order they were added. Adding a name twice replaces
/// the earlier rows in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    entries: Vec<(String, Vec<FieldMap>)>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `rows` under `name`.
    pub fn insert(&mut self, name: impl Into<String>, rows: Vec<FieldMap>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => {
                log::warn!("Query name '{name}' registered twice; keeping the later result");
                entry.1 = rows;
            }
            None => self.entries.push((name, rows)),
        }
    }

    /// Rows stored under `name`.
    pub fn get(&self, name: &str) -> Option<&[FieldMap]> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, rows)| rows.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FieldMap])> {
        self.entries
            .iter()
            .map(|(name, rows)| (name.as_str(), rows.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, rows) in &self.entries {
            map.serialize_entry(name, rows)?;
        }
        map.end()
    }
}
