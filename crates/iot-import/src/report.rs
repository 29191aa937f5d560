//! Per-batch import outcome

use iot_core::EntityKind;
use std::fmt;

/// Outcome of one importer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Entity the batch contained
    pub entity: EntityKind,
    /// Records handed to the importer
    pub processed: usize,
    /// Rows actually written
    pub inserted: usize,
    /// Records skipped because their key already existed
    pub duplicates: usize,
    /// Identifiers of records whose parent never resolved
    pub orphans: Vec<String>,
    /// Insertion passes over the batch
    pub waves: usize,
}

impl ImportReport {
    pub(crate) fn new(entity: EntityKind, processed: usize) -> Self {
        Self {
            entity,
            processed,
            inserted: 0,
            duplicates: 0,
            orphans: Vec::new(),
            waves: 0,
        }
    }

    /// Records that reached the store, written or already present.
    pub fn accepted(&self) -> usize {
        self.inserted + self.duplicates
    }

    pub(crate) fn record_insert(&mut self, affected: usize) {
        if affected == 0 {
            self.duplicates += 1;
        } else {
            self.inserted += affected;
        }
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} processed, {} inserted, {} duplicates",
            self.entity, self.processed, self.inserted, self.duplicates
        )?;
        if !self.orphans.is_empty() {
            write!(f, ", {} orphans", self.orphans.len())?;
        }
        if self.waves > 1 {
            write!(f, " in {} waves", self.waves)?;
        }
        Ok(())
    }
}
