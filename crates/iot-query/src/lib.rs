//! iot-query - Analytical queries and result export for iotflow
//!
//! This crate provides the static query catalog, the runner that executes it
//! against a [`Gateway`](iot_db::Gateway) into an ordered [`ResultSet`], and
//! the JSON and XML exporters that write that set to disk.

pub mod catalog;
pub mod error;
pub mod export;
pub mod results;
pub mod runner;

pub use catalog::{QueryDef, QUERIES};
pub use error::{QueryError, QueryResult};
pub use export::{ExportFormat, Exporter, JsonExporter, XmlExporter};
pub use results::ResultSet;
pub use runner::run_queries;
