//! Domain model for task dependencies.

mod dependency;
mod error;
mod graph;
mod kind;

pub use dependency::{Dependency, DependencyId, NewDependency, PersistedDependencyData};
pub use error::{DependencyError, ParseDependencyTypeError};
pub use graph::{DependencyGraph, DependencyRecord, DependencyView, Neighbors, TaskSummary};
pub use kind::{DependencyLabel, DependencyType, Perspective};
