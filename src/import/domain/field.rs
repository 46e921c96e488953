//! Import fields and the header-to-field column mapping.

use super::{ImportError, RawRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A task attribute an import column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportField {
    /// Phase grouping; blank rows go to the default phase.
    PhaseName,
    /// Task name (required).
    TaskName,
    /// Task description.
    TaskDescription,
    /// Comma-separated assignees; the first is primary.
    AssignedTo,
    /// Estimated hours.
    EstimatedHours,
    /// Actual hours.
    ActualHours,
    /// Due date.
    DueDate,
    /// Priority name.
    Priority,
    /// Service name.
    Service,
    /// Free-text task type.
    TaskType,
    /// Status name.
    Status,
    /// Comma-separated tags.
    Tags,
}

impl ImportField {
    /// Every field in template column order.
    pub const ALL: [Self; 12] = [
        Self::PhaseName,
        Self::TaskName,
        Self::TaskDescription,
        Self::AssignedTo,
        Self::EstimatedHours,
        Self::ActualHours,
        Self::DueDate,
        Self::Priority,
        Self::Service,
        Self::TaskType,
        Self::Status,
        Self::Tags,
    ];

    /// Order in which header aliases are tried. More specific fields come
    /// first so that e.g. `phase name` is not taken for the task name.
    const ALIAS_ORDER: [Self; 12] = [
        Self::PhaseName,
        Self::TaskDescription,
        Self::TaskType,
        Self::AssignedTo,
        Self::EstimatedHours,
        Self::ActualHours,
        Self::DueDate,
        Self::Priority,
        Self::Service,
        Self::Status,
        Self::Tags,
        Self::TaskName,
    ];

    /// Returns the template header for the field.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::PhaseName => "phase_name",
            Self::TaskName => "task_name",
            Self::TaskDescription => "task_description",
            Self::AssignedTo => "assigned_to",
            Self::EstimatedHours => "estimated_hours",
            Self::ActualHours => "actual_hours",
            Self::DueDate => "due_date",
            Self::Priority => "priority",
            Self::Service => "service",
            Self::TaskType => "task_type",
            Self::Status => "status",
            Self::Tags => "tags",
        }
    }

    /// Returns `true` when an import cannot proceed without the field.
    #[must_use]
    pub const fn is_required(self) -> bool {
        matches!(self, Self::TaskName)
    }

    const fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::PhaseName => &["phase", "milestone", "stage"],
            Self::TaskName => &["task", "name", "title", "summary"],
            Self::TaskDescription => &["description", "details", "notes"],
            Self::AssignedTo => &["assign", "owner", "agent", "resource"],
            Self::EstimatedHours => &["estimate", "planned"],
            Self::ActualHours => &["actual", "spent", "logged"],
            Self::DueDate => &["due", "deadline", "date"],
            Self::Priority => &["priority"],
            Self::Service => &["service"],
            Self::TaskType => &["type", "category"],
            Self::Status => &["status", "state"],
            Self::Tags => &["tag", "label"],
        }
    }
}

impl fmt::Display for ImportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Which upload column feeds each field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    columns: BTreeMap<ImportField, usize>,
    column_count: usize,
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|character| character.to_ascii_lowercase())
        .collect()
}

impl ColumnMapping {
    /// Suggests a mapping for the given headers.
    ///
    /// Headers equal to a field's template name (ignoring case and
    /// punctuation) win first; remaining headers are matched by alias
    /// substrings. Each header feeds at most one field.
    #[must_use]
    pub fn suggest<S: AsRef<str>>(headers: &[S]) -> Self {
        let normalized: Vec<String> = headers
            .iter()
            .map(|header| normalize_header(header.as_ref()))
            .collect();
        let mut mapping = Self {
            columns: BTreeMap::new(),
            column_count: headers.len(),
        };

        for field in ImportField::ALL {
            let wanted = normalize_header(field.header());
            if let Some(index) = normalized.iter().position(|header| *header == wanted) {
                mapping.columns.insert(field, index);
            }
        }

        for field in ImportField::ALIAS_ORDER {
            if mapping.columns.contains_key(&field) {
                continue;
            }
            let candidate = normalized.iter().enumerate().find(|(index, header)| {
                !header.is_empty()
                    && !mapping.is_used(*index)
                    && field.aliases().iter().any(|alias| header.contains(alias))
            });
            if let Some((index, _)) = candidate {
                mapping.columns.insert(field, index);
            }
        }
        mapping
    }

    /// Returns the column feeding `field`.
    #[must_use]
    pub fn column(&self, field: ImportField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// Maps `field` to a column, or unmaps it with `None`.
    ///
    /// A column already feeding another field is moved to `field`.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::ColumnOutOfRange`] when `index` is past the
    /// last column.
    pub fn set(&mut self, field: ImportField, index: Option<usize>) -> Result<(), ImportError> {
        let Some(column) = index else {
            self.columns.remove(&field);
            return Ok(());
        };
        if column >= self.column_count {
            return Err(ImportError::ColumnOutOfRange {
                field,
                index: column,
                columns: self.column_count,
            });
        }
        self.columns.retain(|_, existing| *existing != column);
        self.columns.insert(field, column);
        Ok(())
    }

    /// Checks that every required field is mapped.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::MissingRequiredField`] for the first unmapped
    /// required field.
    pub fn ensure_required(&self) -> Result<(), ImportError> {
        ImportField::ALL
            .into_iter()
            .filter(|field| field.is_required())
            .find(|field| !self.columns.contains_key(field))
            .map_or(Ok(()), |field| Err(ImportError::MissingRequiredField(field)))
    }

    /// Returns the trimmed cell feeding `field`, or `None` when the field is
    /// unmapped or the cell is blank.
    #[must_use]
    pub fn cell<'a>(&self, record: &'a RawRecord, field: ImportField) -> Option<&'a str> {
        self.column(field)
            .and_then(|index| record.cells.get(index))
            .map(|cell| cell.trim())
            .filter(|cell| !cell.is_empty())
    }

    fn is_used(&self, index: usize) -> bool {
        self.columns.values().any(|column| *column == index)
    }
}
