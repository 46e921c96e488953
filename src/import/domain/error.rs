//! Error types for import sessions.

use super::{ImportField, ImportStage};
use crate::project::domain::{StatusId, UserId};
use thiserror::Error;

/// Errors that stop an import step.
///
/// Row-level problems are not errors; they are reported per row through
/// [`RowValidation`](super::RowValidation) and
/// [`ImportRowError`](super::ImportRowError).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImportError {
    /// The upload has no header row.
    #[error("import file is empty")]
    EmptyInput,

    /// The upload is not valid CSV.
    #[error("invalid CSV: {0}")]
    Csv(String),

    /// A required field has no column.
    #[error("required field '{0}' is not mapped to a column")]
    MissingRequiredField(ImportField),

    /// A mapping points past the last column.
    #[error("column {index} for '{field}' does not exist; the file has {columns} columns")]
    ColumnOutOfRange {
        /// Field being mapped.
        field: ImportField,
        /// Requested column index.
        index: usize,
        /// Number of columns in the upload.
        columns: usize,
    },

    /// The operation is not allowed in the session's current stage.
    #[error("import is in stage '{actual}' but '{expected}' is required")]
    Stage {
        /// Stage the operation needs.
        expected: ImportStage,
        /// Stage the session is in.
        actual: ImportStage,
    },

    /// Invalid rows block the commit and skipping is disabled.
    #[error("{count} rows are invalid")]
    InvalidRows {
        /// Number of invalid rows.
        count: usize,
    },

    /// An assignee name has no resolution.
    #[error("assignee '{0}' has not been resolved")]
    UnresolvedAgent(String),

    /// A status name has no resolution.
    #[error("status '{0}' has not been resolved")]
    UnresolvedStatus(String),

    /// An agent resolution points at an unknown user.
    #[error("user {0} does not exist")]
    UnknownUser(UserId),

    /// A status resolution points at a status outside the project.
    #[error("status {0} does not belong to the project")]
    UnknownStatus(StatusId),
}
