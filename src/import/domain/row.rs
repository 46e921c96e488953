//! Row validation against reference data.

use super::{ColumnMapping, ImportField, RawRecord};
use crate::project::domain::{
    Priority, PriorityId, ProjectStatus, ServiceId, ServiceRef, StatusId, UserId, UserRef,
    names_match, normalize_name,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Reference data captured once per preview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceSnapshot {
    /// Assignable users.
    pub users: Vec<UserRef>,
    /// The target project's statuses in board order.
    pub statuses: Vec<ProjectStatus>,
    /// Priorities.
    pub priorities: Vec<Priority>,
    /// Services.
    pub services: Vec<ServiceRef>,
}

impl ReferenceSnapshot {
    fn user(&self, name: &str) -> Option<&UserRef> {
        self.users.iter().find(|user| names_match(&user.name, name))
    }

    fn status(&self, name: &str) -> Option<&ProjectStatus> {
        self.statuses.iter().find(|status| names_match(&status.name, name))
    }

    fn priority(&self, name: &str) -> Option<&Priority> {
        self.priorities
            .iter()
            .find(|priority| names_match(&priority.name, name))
    }

    fn service(&self, name: &str) -> Option<&ServiceRef> {
        self.services
            .iter()
            .find(|service| names_match(&service.name, name))
    }
}

/// An assignee name and whether it matched a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentRef {
    /// The name matched a known user.
    Matched {
        /// Matched user.
        id: UserId,
        /// Name as written in the upload.
        name: String,
    },
    /// The name needs an agent resolution.
    Unmatched {
        /// Name as written in the upload.
        name: String,
    },
}

impl AgentRef {
    /// Returns the name as written in the upload.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Matched { name, .. } | Self::Unmatched { name } => name,
        }
    }
}

/// A status name and whether it matched a project status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusRef {
    /// The name matched a status of the project.
    Matched {
        /// Matched status.
        id: StatusId,
        /// Name as written in the upload.
        name: String,
    },
    /// The name needs a status resolution.
    Unmatched {
        /// Name as written in the upload.
        name: String,
    },
}

impl StatusRef {
    /// Returns the name as written in the upload.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Matched { name, .. } | Self::Unmatched { name } => name,
        }
    }
}

/// A validated row, ready to become a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    /// Source line number.
    pub row_number: usize,
    /// Phase name; `None` sends the row to the default phase.
    pub phase_name: Option<String>,
    /// Task name.
    pub task_name: String,
    /// Task description.
    pub description: Option<String>,
    /// Assignees; the first is primary, the rest are resources.
    pub assignees: Vec<AgentRef>,
    /// Estimated hours.
    pub estimated_hours: Option<f64>,
    /// Actual hours.
    pub actual_hours: Option<f64>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Matched priority.
    pub priority_id: Option<PriorityId>,
    /// Matched service.
    pub service_id: Option<ServiceId>,
    /// Free-text task type.
    pub task_type: Option<String>,
    /// Status; `None` uses the project's first open status.
    pub status: Option<StatusRef>,
    /// De-duplicated tags in upload order.
    pub tags: Vec<String>,
}

/// A problem with one field of one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Offending field.
    pub field: ImportField,
    /// Human-readable description.
    pub message: String,
}

impl FieldError {
    fn new(field: ImportField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validation outcome for one row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowValidation {
    /// Source line number.
    pub row_number: usize,
    /// Errors that make the row invalid.
    pub errors: Vec<FieldError>,
    /// Problems that leave the row valid.
    pub warnings: Vec<FieldError>,
    /// The parsed row; present only when the row is valid.
    pub row: Option<ImportRow>,
}

impl RowValidation {
    /// Returns `true` when the row has no errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates one raw record.
#[must_use]
pub fn validate_row(
    record: &RawRecord,
    mapping: &ColumnMapping,
    reference: &ReferenceSnapshot,
) -> RowValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let cell = move |field: ImportField| mapping.cell(record, field);

    let task_name = cell(ImportField::TaskName).map(str::to_owned);
    if task_name.is_none() {
        errors.push(FieldError::new(ImportField::TaskName, "task name is required"));
    }
    let estimated_hours = parse_hours(cell(ImportField::EstimatedHours), ImportField::EstimatedHours, &mut errors);
    let actual_hours = parse_hours(cell(ImportField::ActualHours), ImportField::ActualHours, &mut errors);
    let due_date = cell(ImportField::DueDate).and_then(|value| {
        let parsed = parse_date(value);
        if parsed.is_none() {
            errors.push(FieldError::new(
                ImportField::DueDate,
                format!("'{value}' is not a date (use YYYY-MM-DD or MM/DD/YYYY)"),
            ));
        }
        parsed
    });

    let priority_id = cell(ImportField::Priority).and_then(|name| {
        let found = reference.priority(name).map(|priority| priority.id);
        if found.is_none() {
            warnings.push(FieldError::new(ImportField::Priority, format!("unknown priority '{name}'")));
        }
        found
    });
    let service_id = cell(ImportField::Service).and_then(|name| {
        let found = reference.service(name).map(|service| service.id);
        if found.is_none() {
            warnings.push(FieldError::new(ImportField::Service, format!("unknown service '{name}'")));
        }
        found
    });

    let assignees = split_list(cell(ImportField::AssignedTo))
        .into_iter()
        .map(|name| match reference.user(&name) {
            Some(user) => AgentRef::Matched { id: user.id, name },
            None => AgentRef::Unmatched { name },
        })
        .collect();
    let status = cell(ImportField::Status).map(|name| match reference.status(name) {
        Some(status) => StatusRef::Matched {
            id: status.id,
            name: name.to_owned(),
        },
        None => StatusRef::Unmatched {
            name: name.to_owned(),
        },
    });

    let row = match (errors.is_empty(), task_name) {
        (true, Some(name)) => Some(ImportRow {
            row_number: record.row_number,
            phase_name: cell(ImportField::PhaseName).map(str::to_owned),
            task_name: name,
            description: cell(ImportField::TaskDescription).map(str::to_owned),
            assignees,
            estimated_hours,
            actual_hours,
            due_date,
            priority_id,
            service_id,
            task_type: cell(ImportField::TaskType).map(str::to_owned),
            status,
            tags: split_list(cell(ImportField::Tags)),
        }),
        _ => None,
    };

    RowValidation {
        row_number: record.row_number,
        errors,
        warnings,
        row,
    }
}

fn parse_hours(value: Option<&str>, field: ImportField, errors: &mut Vec<FieldError>) -> Option<f64> {
    let raw = value?;
    match raw.parse::<f64>() {
        Ok(hours) if hours.is_finite() && hours >= 0.0 => Some(hours),
        _ => {
            errors.push(FieldError::new(
                field,
                format!("'{raw}' is not a non-negative number of hours"),
            ));
            None
        }
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Splits a comma-separated cell into trimmed, non-empty, de-duplicated
/// entries, keeping the first spelling of each.
fn split_list(value: Option<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    value
        .into_iter()
        .flat_map(|cell| cell.split(','))
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter(|entry| seen.insert(normalize_name(entry)))
        .map(str::to_owned)
        .collect()
}
