//! iot-import - Entity importers for iotflow
//!
//! Locations form a self-referencing hierarchy and are inserted in waves so
//! every parent is persisted before its children. Devices and events have no
//! intra-batch ordering and are imported fail-fast. Each importer commits once
//! at the end of its batch.

pub mod error;
pub mod flat;
pub mod hierarchy;
pub mod report;

pub use error::{ImportError, ImportResult};
pub use flat::import_flat;
pub use hierarchy::import_locations;
pub use report::ImportReport;

use iot_core::{EntityKind, RawRecord};
use iot_db::Gateway;

/// Import `records` of `kind` using the importer that entity needs.
pub fn import_entities(
    gateway: &mut dyn Gateway,
    kind: EntityKind,
    records: &[RawRecord],
) -> ImportResult<ImportReport> {
    match kind {
        EntityKind::Location => import_locations(gateway, records),
        EntityKind::Device | EntityKind::Event => import_flat(gateway, kind, records),
    }
}

/// Roll back the pending transaction after `err`, keeping `err` as the
/// reported failure.
pub(crate) fn rollback_on_error(gateway: &mut dyn Gateway, err: ImportError) -> ImportError {
    log::error!("{err}");
    if let Err(rollback_err) = gateway.rollback() {
        log::error!("Rollback after failed import also failed: {rollback_err}");
    }
    err
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
