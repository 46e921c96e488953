//! Application services for dependency management.

mod dependency;
mod locks;

pub use dependency::{DependencyService, DependencyServiceError, DependencyServiceResult};
pub use locks::ProjectLocks;
