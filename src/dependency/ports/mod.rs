//! Port contracts for dependency persistence.

pub mod repository;

pub use repository::{DependencyRepository, DependencyRepositoryError, DependencyRepositoryResult};
