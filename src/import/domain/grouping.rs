//! Grouping validated rows into phases.

use super::ImportRow;
use crate::project::domain::normalize_name;
use serde::{Deserialize, Serialize};

/// Whether a group came from a phase name or collects unnamed rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseGroupKind {
    /// Rows that named this phase.
    Named,
    /// Rows with a blank phase name.
    Default,
}

/// Rows destined for one phase, in upload order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedPhase {
    /// Phase name; the first spelling seen for named groups.
    pub name: String,
    /// Where the group came from.
    pub kind: PhaseGroupKind,
    /// Rows of the group.
    pub rows: Vec<ImportRow>,
}

impl GroupedPhase {
    /// Returns `true` for the group collecting rows without a phase name.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.kind == PhaseGroupKind::Default
    }
}

/// Groups rows by phase name in order of first appearance.
///
/// Names are compared case-insensitively. Rows without a phase name go to a
/// single group named `default_phase_name`; a named group with the same
/// normalized name is merged into it.
#[must_use]
pub fn group_rows(rows: impl IntoIterator<Item = ImportRow>, default_phase_name: &str) -> Vec<GroupedPhase> {
    let mut groups: Vec<(String, GroupedPhase)> = Vec::new();
    for row in rows {
        let (name, kind) = match row.phase_name.as_deref() {
            Some(name) if !name.trim().is_empty() => (name.trim().to_owned(), PhaseGroupKind::Named),
            _ => (default_phase_name.to_owned(), PhaseGroupKind::Default),
        };
        let key = normalize_name(&name);
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, group)) => {
                if kind == PhaseGroupKind::Default {
                    group.kind = PhaseGroupKind::Default;
                }
                group.rows.push(row);
            }
            None => groups.push((
                key,
                GroupedPhase {
                    name,
                    kind,
                    rows: vec![row],
                },
            )),
        }
    }
    groups.into_iter().map(|(_, group)| group).collect()
}
