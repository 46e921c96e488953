//! Error types for dependency graph operations.

use super::DependencyType;
use crate::project::domain::TaskId;
use thiserror::Error;

/// Errors returned when an edge is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DependencyError {
    /// An endpoint is not a task of the project.
    #[error("task {0} is not part of this project")]
    UnknownTask(TaskId),

    /// Both endpoints are the same task.
    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    /// The same relationship already links the two tasks.
    #[error("a {kind} dependency from {predecessor} to {successor} already exists")]
    DuplicateEdge {
        /// Requested predecessor.
        predecessor: TaskId,
        /// Requested successor.
        successor: TaskId,
        /// Requested relationship type.
        kind: DependencyType,
    },

    /// The edge would close a cycle among sequencing edges.
    #[error("dependency would create a cycle: {}", render_path(path))]
    Cycle {
        /// Tasks along the cycle, starting and ending with the predecessor.
        path: Vec<TaskId>,
    },
}

fn render_path(path: &[TaskId]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Error returned when a dependency type name is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown dependency type: {0}")]
pub struct ParseDependencyTypeError(pub String);
