//! iot-core - Core library for iotflow
//!
//! This crate provides the value types shared by the storage gateway, the
//! importers and the query runner, together with raw record loading, entity
//! transformers and `iotflow.yml` configuration parsing.

pub mod config;
pub mod entity;
pub mod error;
pub mod record;
pub mod value;

pub use config::{Config, DatabaseConfig};
pub use entity::EntityKind;
pub use error::{CoreError, CoreResult};
pub use record::{read_records, RawRecord};
pub use value::{Cell, FieldMap};
