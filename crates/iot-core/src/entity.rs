//! Entity variants and their pure record transformers.
//!
//! Each [`EntityKind`] knows its target table, the natural key used for
//! conflict-ignore inserts, and how to map a [`RawRecord`] to the columns
//! written to that table. Transformers never mutate their input.

use crate::record::{field, RawRecord};
use crate::value::{Cell, FieldMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The three imported entity types, in import order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Self-referencing location hierarchy
    Location,
    /// Device installed at a location
    Device,
    /// Event emitted by a device
    Event,
}

impl EntityKind {
    /// All entity kinds in foreign-key dependency order.
    pub const ALL: [EntityKind; 3] = [EntityKind::Location, EntityKind::Device, EntityKind::Event];

    /// Target table name.
    pub fn table_name(self) -> &'static str {
        match self {
            EntityKind::Location => "locations",
            EntityKind::Device => "devices",
            EntityKind::Event => "events",
        }
    }

    /// Unique key whose conflicts are silently ignored on insert.
    pub fn conflict_key(self) -> &'static str {
        match self {
            EntityKind::Location => "location_id",
            EntityKind::Device => "device_id",
            EntityKind::Event => "event_id",
        }
    }

    /// Map a raw record to the columns inserted into [`table_name`](Self::table_name).
    pub fn transform(self, raw: &RawRecord) -> FieldMap {
        match self {
            EntityKind::Location => transform_location(raw),
            EntityKind::Device => transform_device(raw),
            EntityKind::Event => transform_event(raw),
        }
    }

    /// The record's own identifier, if present.
    pub fn record_id(self, raw: &RawRecord) -> Option<String> {
        Cell::from(field(raw, self.conflict_key())).as_key()
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Location => write!(f, "location"),
            EntityKind::Device => write!(f, "device"),
            EntityKind::Event => write!(f, "event"),
        }
    }
}

fn pass_through(raw: &RawRecord, columns: &[&str]) -> FieldMap {
    columns.iter().fold(FieldMap::new(), |fields, column| {
        fields.with(*column, Cell::from(field(raw, column)))
    })
}

/// `{location_id, parent_location_id, location_name}` pass-through.
pub fn transform_location(raw: &RawRecord) -> FieldMap {
    pass_through(raw, &["location_id", "parent_location_id", "location_name"])
}

/// `{device_id, device_type, device_name, location_id}` pass-through.
pub fn transform_device(raw: &RawRecord) -> FieldMap {
    pass_through(
        raw,
        &["device_id", "device_type", "device_name", "location_id"],
    )
}

/// Split an event's nested `details` into indexed columns plus a residual
/// JSON payload.
///
/// `device_id` and `timestamp` are lifted out of a copy of `details`; what is
/// left is serialized to a JSON string, `{}` when nothing remains. A missing
/// or non-object `details` counts as empty.
pub fn transform_event(raw: &RawRecord) -> FieldMap {
    let mut details = match field(raw, "details") {
        Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };

    let device_id = details.remove("device_id").unwrap_or(Value::Null);
    let timestamp = details.remove("timestamp").unwrap_or(Value::Null);

    FieldMap::new()
        .with("event_id", Cell::from(field(raw, "event_id")))
        .with("device_id", Cell::from(&device_id))
        .with("timestamp", Cell::from(&timestamp))
        .with("details", Value::Object(details).to_string())
}

#[cfg(test)]
#[path = "entity_test.rs"]
mod tests;
