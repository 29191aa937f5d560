//! Wave-based insertion of the self-referencing location hierarchy.
//!
//! The batch is walked in passes. A location is ready once its parent is null
//! or already persisted; ready locations are inserted in input order and
//! become available as parents for the rest of the same pass. Locations that
//! are not ready are deferred to the next pass.
//!
//! When a pass inserts nothing, the missing parents of the deferred
//! locations are looked up in the store, since they may come from an earlier
//! run. Whatever still has no parent is reported as an orphan and skipped;
//! the rest of the batch is committed.

use crate::error::{ImportError, ImportResult};
use crate::report::ImportReport;
use crate::rollback_on_error;
use iot_core::{Cell, EntityKind, FieldMap, RawRecord};
use iot_db::Gateway;
use std::collections::{BTreeSet, HashSet};

const KIND: EntityKind = EntityKind::Location;
const PARENT_COLUMN: &str = "parent_location_id";

/// A location waiting to be scheduled.
#[derive(Debug)]
struct Scheduled {
    /// Normalized own identifier
    id: Option<String>,
    /// Normalized parent identifier, `None` for roots
    parent: Option<String>,
    fields: FieldMap,
}

impl Scheduled {
    fn from_raw(raw: &RawRecord) -> Self {
        let mut fields = KIND.transform(raw);
        let id = fields.get(KIND.conflict_key()).and_then(Cell::as_key);
        let mut parent = fields.get(PARENT_COLUMN).and_then(Cell::as_key);

        // A location that names itself as parent is a root.
        if parent.is_some() && parent == id {
            log::debug!(
                "Location {} references itself as parent; importing it as a root",
                id.as_deref().unwrap_or_default()
            );
            parent = None;
            fields.insert(PARENT_COLUMN, Cell::Null);
        }

        Self { id, parent, fields }
    }

    fn is_ready(&self, persisted: &HashSet<String>) -> bool {
        self.parent
            .as_ref()
            .map_or(true, |parent| persisted.contains(parent))
    }

    fn label(&self) -> String {
        self.id.clone().unwrap_or_else(|| "<missing id>".to_string())
    }
}

/// Insert `records` so that every parent precedes its children.
///
/// Orphans are a soft failure: they are listed in the report and logged,
/// and everything else is still committed. A storage error rolls back the
/// whole batch and is returned.
pub fn import_locations(
    gateway: &mut dyn Gateway,
    records: &[RawRecord],
) -> ImportResult<ImportReport> {
    let mut report = ImportReport::new(KIND, records.len());
    let mut persisted: HashSet<String> = HashSet::new();
    let mut looked_up: HashSet<String> = HashSet::new();
    let mut batch: Vec<Scheduled> = records.iter().map(Scheduled::from_raw).collect();

    while !batch.is_empty() {
        report.waves += 1;
        let mut deferred = Vec::new();
        let mut progress = false;

        for location in batch {
            if !location.is_ready(&persisted) {
                deferred.push(location);
                continue;
            }

            let affected = gateway
                .insert(KIND.table_name(), &location.fields, Some(KIND.conflict_key()))
                .map_err(|source| ImportError::Insert {
                    entity: KIND,
                    record_id: location.label(),
                    source,
                })
                .map_err(|e| rollback_on_error(gateway, e))?;
            report.record_insert(affected);
            if let Some(id) = location.id {
                persisted.insert(id);
            }
            progress = true;
        }

        if !progress && !deferred.is_empty() {
            let resolved = resolve_stored_parents(gateway, &deferred, &mut looked_up)?;
            if resolved.is_empty() {
                report.orphans = deferred.iter().map(Scheduled::label).collect();
                log::warn!(
                    "Could not insert {} locations due to missing parents: {}",
                    report.orphans.len(),
                    report.orphans.join(", ")
                );
                break;
            }
            log::debug!(
                "Resolved {} parent locations from earlier runs",
                resolved.len()
            );
            persisted.extend(resolved);
        }

        batch = deferred;
    }

    gateway
        .commit()
        .map_err(|source| ImportError::Commit {
            entity: KIND,
            source,
        })?;
    log::info!("Imported {report}");
    Ok(report)
}

/// Look up the distinct missing parents of `deferred` in the store.
///
/// Each parent is queried at most once per import; `looked_up` tracks them.
fn resolve_stored_parents(
    gateway: &mut dyn Gateway,
    deferred: &[Scheduled],
    looked_up: &mut HashSet<String>,
) -> ImportResult<Vec<String>> {
    let missing: BTreeSet<&String> = deferred
        .iter()
        .filter_map(|location| location.parent.as_ref())
        .filter(|parent| !looked_up.contains(*parent))
        .collect();

    let mut found = Vec::new();
    for parent in missing {
        looked_up.insert(parent.clone());
        let exists = gateway
            .exists(
                KIND.table_name(),
                KIND.conflict_key(),
                &Cell::Text(parent.clone()),
            )
            .map_err(|source| ImportError::ParentLookup {
                parent_id: parent.clone(),
                source,
            })
            .map_err(|e| rollback_on_error(gateway, e))?;
        if exists {
            found.push(parent.clone());
        }
    }
    Ok(found)
}

#[cfg(test)]
#[path = "hierarchy_test.rs"]
mod tests;
