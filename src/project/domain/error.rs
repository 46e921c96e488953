//! Error types for phase and task construction and placement.

use super::{PhaseId, ProjectId, StatusId, TaskId};
use crate::ordering::{OrderKey, OrderKeyError, WbsError};
use thiserror::Error;

/// Errors returned while building or rearranging a project plan.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanDomainError {
    /// The phase name is empty after trimming.
    #[error("phase name must not be empty")]
    EmptyPhaseName,

    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// A checklist item has no text.
    #[error("checklist item text must not be empty")]
    EmptyChecklistItem,

    /// A checklist index is out of range.
    #[error("checklist item {0} does not exist")]
    ChecklistItemNotFound(usize),

    /// The phase ends before it starts.
    #[error("phase ends on {end} before it starts on {start}")]
    InvalidDateRange {
        /// Phase start date.
        start: chrono::NaiveDate,
        /// Phase end date.
        end: chrono::NaiveDate,
    },

    /// An hours value is negative or not finite.
    #[error("invalid hours value {0}")]
    InvalidHours(String),

    /// The phase is not part of the plan.
    #[error("phase not found: {0}")]
    PhaseNotFound(PhaseId),

    /// The task is not part of the plan.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// A requested neighbour does not sit in the destination column.
    #[error("task {0} is not in the destination column")]
    NeighborNotInColumn(TaskId),

    /// Both neighbours were named but other tasks sit between them.
    #[error("tasks {previous} and {next} are not adjacent in the column")]
    NeighborsNotAdjacent {
        /// Requested lower neighbour.
        previous: TaskId,
        /// Requested upper neighbour.
        next: TaskId,
    },

    /// The destination phase belongs to a different project.
    #[error("task {task} cannot move to project {destination} without confirmation")]
    CrossProjectMove {
        /// Task being moved.
        task: TaskId,
        /// Project owning the destination phase.
        destination: ProjectId,
    },

    /// A confirmed cross-project move of a task that still has dependencies.
    #[error("task {task} has {dependencies} dependencies and cannot leave its project")]
    LinkedTaskMove {
        /// Task being moved.
        task: TaskId,
        /// Number of edges touching the task.
        dependencies: usize,
    },

    /// The caller's view of the task's order key is out of date.
    #[error("task order key is '{actual}', expected '{expected}'")]
    StaleOrder {
        /// Key the caller expected the task to have.
        expected: OrderKey,
        /// Key the task currently has.
        actual: OrderKey,
    },

    /// The status is not one of the destination project's statuses.
    #[error("status {0} does not belong to the destination project")]
    UnknownStatus(StatusId),

    /// A bulk reorder list does not match the column's membership.
    #[error("bulk reorder lists {listed} tasks but the column holds {actual}")]
    BulkMismatch {
        /// Number of distinct tasks in the submitted list.
        listed: usize,
        /// Number of tasks currently in the column.
        actual: usize,
    },

    /// Order key generation failed.
    #[error(transparent)]
    OrderKey(#[from] OrderKeyError),

    /// WBS code generation failed.
    #[error(transparent)]
    Wbs(#[from] WbsError),
}
