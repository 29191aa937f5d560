//! Fail-fast importer for devices and events.

use crate::error::{ImportError, ImportResult};
use crate::report::ImportReport;
use crate::rollback_on_error;
use iot_core::{EntityKind, RawRecord};
use iot_db::Gateway;

/// Transform and insert every record of `kind`, then commit once.
///
/// Duplicate keys are ignored. Any other insert failure rolls back every
/// row of the batch and is returned.
pub fn import_flat(
    gateway: &mut dyn Gateway,
    kind: EntityKind,
    records: &[RawRecord],
) -> ImportResult<ImportReport> {
    let mut report = ImportReport::new(kind, records.len());
    if !records.is_empty() {
        report.waves = 1;
    }

    for raw in records {
        let fields = kind.transform(raw);
        let affected = gateway
            .insert(kind.table_name(), &fields, Some(kind.conflict_key()))
            .map_err(|source| ImportError::Insert {
                entity: kind,
                record_id: kind
                    .record_id(raw)
                    .unwrap_or_else(|| "<missing id>".to_string()),
                source,
            })
            .map_err(|e| rollback_on_error(gateway, e))?;
        report.record_insert(affected);
    }

    gateway
        .commit()
        .map_err(|source| ImportError::Commit {
            entity: kind,
            source,
        })?;
    log::info!("Imported {report}");
    Ok(report)
}

#[cfg(test)]
#[path = "flat_test.rs"]
mod tests;
