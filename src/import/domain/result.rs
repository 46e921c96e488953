//! Commit outcome and cancellation.

use super::GroupedPhase;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A row that could not be committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowError {
    /// Source line number.
    pub row_number: usize,
    /// Why the row failed.
    pub message: String,
}

/// Counts and row errors of one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    /// Phases created; reused phases are not counted.
    pub phases_created: usize,
    /// Tasks created.
    pub tasks_created: usize,
    /// Rows that failed.
    pub errors: Vec<ImportRowError>,
    /// Row numbers that became tasks.
    pub committed_rows: BTreeSet<usize>,
    /// Whether the commit stopped early.
    pub aborted: bool,
}

impl ImportResult {
    /// Returns the groups with only the rows that were neither committed
    /// nor failed, dropping groups left empty.
    #[must_use]
    pub fn remaining(&self, groups: &[GroupedPhase]) -> Vec<GroupedPhase> {
        let failed: BTreeSet<usize> = self.errors.iter().map(|error| error.row_number).collect();
        groups
            .iter()
            .filter_map(|group| {
                let rows: Vec<_> = group
                    .rows
                    .iter()
                    .filter(|row| {
                        !self.committed_rows.contains(&row.row_number)
                            && !failed.contains(&row.row_number)
                    })
                    .cloned()
                    .collect();
                (!rows.is_empty()).then(|| GroupedPhase {
                    rows,
                    ..group.clone()
                })
            })
            .collect()
    }
}

/// Shared flag that stops a running commit before its next row.
#[derive(Debug, Clone, Default)]
pub struct ImportAbort(Arc<AtomicBool>);

impl ImportAbort {
    /// Creates an unset flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the commit to stop.
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`Self::abort`] has been called on any clone.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
