//! Raw JSON input records.
//!
//! Input files are JSON arrays of flat objects. Loading is lenient: a missing
//! or malformed file is logged and read as an empty batch so later import
//! phases still run.

use serde_json::{Map, Value};
use std::path::Path;

/// One untyped input record, exactly as it appeared in the JSON file.
pub type RawRecord = Map<String, Value>;

/// Read a JSON file holding a list of records.
///
/// Returns an empty list (after logging an error) when the file cannot be
/// read, is not valid JSON, or is not an array of objects.
pub fn read_records(path: &Path) -> Vec<RawRecord> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            log::error!("Failed to read file {}: {e}", path.display());
            return Vec::new();
        }
    };

    match parse_records(&content) {
        Ok(records) => {
            log::info!("Read {} records from {}", records.len(), path.display());
            records
        }
        Err(e) => {
            log::error!("Failed to read file {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// Parse a JSON document into a list of records.
pub fn parse_records(content: &str) -> Result<Vec<RawRecord>, serde_json::Error> {
    serde_json::from_str(content)
}

/// Field lookup that treats an absent key and an explicit `null` alike.
pub(crate) fn field<'a>(record: &'a RawRecord, key: &str) -> &'a Value {
    record.get(key).unwrap_or(&Value::Null)
}

#[cfg(test)]
#[path = "record_test.rs"]
mod tests;
