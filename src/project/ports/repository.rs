//! Repository port for phase and task persistence.

use crate::project::domain::{Phase, PhaseId, ProjectId, ProjectPlan, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for plan repository operations.
pub type PlanRepositoryResult<T> = Result<T, PlanRepositoryError>;

/// Phase and task persistence contract.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Loads every phase and task of a project.
    ///
    /// An unknown project yields an empty plan.
    async fn load_plan(&self, project_id: ProjectId) -> PlanRepositoryResult<ProjectPlan>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_task(&self, id: TaskId) -> PlanRepositoryResult<Option<Task>>;

    /// Finds a phase by identifier.
    ///
    /// Returns `None` when the phase does not exist.
    async fn find_phase(&self, id: PhaseId) -> PlanRepositoryResult<Option<Phase>>;

    /// Inserts or updates a phase.
    async fn save_phase(&self, phase: &Phase) -> PlanRepositoryResult<()>;

    /// Inserts or updates a task.
    ///
    /// # Errors
    ///
    /// Returns [`PlanRepositoryError::PhaseNotFound`] when the task's phase
    /// has not been saved.
    async fn save_task(&self, task: &Task) -> PlanRepositoryResult<()>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`PlanRepositoryError::TaskNotFound`] when the task does not
    /// exist.
    async fn delete_task(&self, id: TaskId) -> PlanRepositoryResult<()>;
}

/// Errors returned by plan repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PlanRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The phase was not found.
    #[error("phase not found: {0}")]
    PhaseNotFound(PhaseId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PlanRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
