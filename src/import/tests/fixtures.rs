//! Shared builders for import tests.

use crate::import::domain::{ColumnMapping, ImportField, ImportRow, RawRecord};

/// Mapping for uploads using the template headers.
pub(super) fn template_mapping() -> ColumnMapping {
    let headers: Vec<&str> = ImportField::ALL.iter().map(|field| field.header()).collect();
    ColumnMapping::suggest(&headers)
}

/// A record in template column order with only the given cells filled.
pub(super) fn record(row_number: usize, cells: &[(ImportField, &str)]) -> RawRecord {
    let mut values = vec![String::new(); ImportField::ALL.len()];
    for (field, value) in cells {
        if let Some(index) = ImportField::ALL.iter().position(|candidate| candidate == field) {
            if let Some(slot) = values.get_mut(index) {
                *slot = (*value).to_owned();
            }
        }
    }
    RawRecord {
        row_number,
        cells: values,
    }
}

/// A minimal valid row.
pub(super) fn row(row_number: usize, phase_name: Option<&str>, task_name: &str) -> ImportRow {
    ImportRow {
        row_number,
        phase_name: phase_name.map(str::to_owned),
        task_name: task_name.to_owned(),
        description: None,
        assignees: Vec::new(),
        estimated_hours: None,
        actual_hours: None,
        due_date: None,
        priority_id: None,
        service_id: None,
        task_type: None,
        status: None,
        tags: Vec::new(),
    }
}
