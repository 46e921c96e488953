//! Service-level errors shared by the plan services.

use crate::dependency::ports::DependencyRepositoryError;
use crate::project::{
    domain::PlanDomainError,
    ports::{PlanRepositoryError, ReferenceDataError},
};
use thiserror::Error;

/// Errors returned by plan services.
#[derive(Debug, Error)]
pub enum PlanServiceError {
    /// Domain validation or placement failed.
    #[error(transparent)]
    Domain(#[from] PlanDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] PlanRepositoryError),
    /// Reference data lookup failed.
    #[error(transparent)]
    ReferenceData(#[from] ReferenceDataError),
    /// Dependency lookup failed.
    #[error(transparent)]
    Dependencies(#[from] DependencyRepositoryError),
}

/// Result type for plan service operations.
pub type PlanServiceResult<T> = Result<T, PlanServiceError>;
