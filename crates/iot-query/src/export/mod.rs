//! Result exporters.
//!
//! An [`Exporter`] renders a [`ResultSet`] to text; the provided
//! [`export`](Exporter::export) writes that text to a file, creating missing
//! parent directories first.

mod json;
mod xml;

pub use json::JsonExporter;
pub use xml::XmlExporter;

use crate::error::{QueryError, QueryResult};
use crate::results::ResultSet;
use std::path::Path;
use std::str::FromStr;

/// Output format capability.
pub trait Exporter {
    /// File extension without the leading dot.
    fn extension(&self) -> &'static str;

    /// Render `results` in this format.
    fn convert(&self, results: &ResultSet) -> QueryResult<String>;

    /// Render `results` and write them to `path`.
    fn export(&self, results: &ResultSet, path: &Path) -> QueryResult<()> {
        let content = self.convert(results)?;
        let io_err = |source| QueryError::Io {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, content).map_err(io_err)?;
        log::info!("Exported {} result sets to {}", results.len(), path.display());
        Ok(())
    }
}

/// Supported output formats, parsed case-insensitively from `json` or `xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty-printed JSON
    Json,
    /// XML with a `results` root element
    Xml,
}

impl ExportFormat {
    /// The exporter writing this format.
    pub fn exporter(self) -> Box<dyn Exporter> {
        match self {
            ExportFormat::Json => Box::new(JsonExporter),
            ExportFormat::Xml => Box::new(XmlExporter),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "xml" => Ok(ExportFormat::Xml),
            other => Err(format!("unsupported export format '{other}' (expected json or xml)")),
        }
    }
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
