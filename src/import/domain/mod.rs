//! Domain model for CSV import reconciliation.

mod error;
mod field;
mod grouping;
mod resolution;
mod result;
mod row;
mod session;
mod table;

pub use error::ImportError;
pub use field::{ColumnMapping, ImportField};
pub use grouping::{GroupedPhase, PhaseGroupKind, group_rows};
pub use resolution::{AgentResolution, ImportResolutions, StatusResolution};
pub use result::{ImportAbort, ImportResult, ImportRowError};
pub use row::{AgentRef, FieldError, ImportRow, ReferenceSnapshot, RowValidation, StatusRef, validate_row};
pub use session::{ImportSession, ImportStage};
pub use table::{RawRecord, RawTable, Truncation};
