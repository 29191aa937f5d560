//! iot-db - Storage gateway for iotflow
//!
//! This crate provides the [`Gateway`] trait used by importers and the query
//! runner, and its DuckDB implementation with the embedded pipeline schema.

pub mod convert;
pub mod duckdb;
pub mod error;
pub mod gateway;
pub mod schema;
pub mod sql;
#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use crate::duckdb::DuckDbGateway;
pub use error::{DbError, DbResult};
pub use gateway::Gateway;
