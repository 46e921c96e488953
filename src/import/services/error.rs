//! Service-level errors for imports.

use crate::import::domain::ImportError;
use crate::project::{
    domain::PlanDomainError,
    ports::{PlanRepositoryError, ReferenceDataError},
};
use thiserror::Error;

/// Errors returned by the import reconciler.
#[derive(Debug, Error)]
pub enum ImportServiceError {
    /// The import session rejected the step.
    #[error(transparent)]
    Import(#[from] ImportError),
    /// Phase or task construction failed.
    #[error(transparent)]
    Domain(#[from] PlanDomainError),
    /// Plan persistence failed.
    #[error(transparent)]
    Repository(#[from] PlanRepositoryError),
    /// Reference data lookup failed.
    #[error(transparent)]
    ReferenceData(#[from] ReferenceDataError),
}

/// Result type for import service operations.
pub type ImportServiceResult<T> = Result<T, ImportServiceError>;
