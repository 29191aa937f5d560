use super::Exporter;
use crate::error::{QueryError, QueryResult};
use crate::results::ResultSet;

/// Pretty-printed JSON with two-space indentation.
///
/// Decimal cells are written as plain numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn convert(&self, results: &ResultSet) -> QueryResult<String> {
        serde_json::to_string_pretty(results).map_err(|e| QueryError::Serialize {
            format: "json",
            message: e.to_string(),
        })
    }
}
