//! Port contracts for project plans.
//!
//! Ports define infrastructure-agnostic interfaces used by the reorder and
//! import services.

pub mod reference;
pub mod repository;

pub use reference::{ReferenceDataError, ReferenceDataResult, ReferenceDataSource};
pub use repository::{PlanRepository, PlanRepositoryError, PlanRepositoryResult};
