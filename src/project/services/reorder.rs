//! Coordinator for drag-and-drop moves and bulk reorders.

use super::PlanServiceResult;
use crate::dependency::{ports::DependencyRepository, services::ProjectLocks};
use crate::project::{
    domain::{ChangeSet, MoveDestination, PhaseId, PlanDomainError, StatusId, Task, TaskId},
    ports::{PlanRepository, ReferenceDataSource},
};
use mockable::Clock;
use std::sync::Arc;

/// Moves tasks between columns and phases, persisting only changed tasks.
///
/// Dependencies never cross projects, so a confirmed cross-project move is
/// rejected while the task still has edges. The check runs under the source
/// project's lock; share the lock table with the
/// [`DependencyService`](crate::dependency::services::DependencyService)
/// through [`Self::with_locks`] so edge mutations cannot interleave.
pub struct ReorderCoordinator<P, R, D, C>
where
    P: PlanRepository,
    R: ReferenceDataSource,
    D: DependencyRepository,
    C: Clock + Send + Sync,
{
    plans: Arc<P>,
    reference: Arc<R>,
    dependencies: Arc<D>,
    clock: Arc<C>,
    locks: Arc<ProjectLocks>,
}

impl<P, R, D, C> Clone for ReorderCoordinator<P, R, D, C>
where
    P: PlanRepository,
    R: ReferenceDataSource,
    D: DependencyRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            plans: Arc::clone(&self.plans),
            reference: Arc::clone(&self.reference),
            dependencies: Arc::clone(&self.dependencies),
            clock: Arc::clone(&self.clock),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<P, R, D, C> ReorderCoordinator<P, R, D, C>
where
    P: PlanRepository,
    R: ReferenceDataSource,
    D: DependencyRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new coordinator with its own lock table.
    #[must_use]
    pub fn new(plans: Arc<P>, reference: Arc<R>, dependencies: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            plans,
            reference,
            dependencies,
            clock,
            locks: Arc::new(ProjectLocks::new()),
        }
    }

    /// Uses a shared per-project lock table.
    #[must_use]
    pub fn with_locks(mut self, locks: Arc<ProjectLocks>) -> Self {
        self.locks = locks;
        self
    }

    /// Moves a task within its column, to another status, or to another
    /// phase.
    ///
    /// Returns exactly the changed tasks; an empty set means the task was
    /// already in place.
    ///
    /// # Errors
    ///
    /// Returns [`PlanServiceError`](super::PlanServiceError) when the task or
    /// destination is unknown, the move is rejected, or persistence fails.
    /// Rejected moves persist nothing. A confirmed cross-project move of a
    /// task with dependencies fails with [`PlanDomainError::LinkedTaskMove`].
    pub async fn move_task(
        &self,
        task_id: TaskId,
        destination: MoveDestination,
    ) -> PlanServiceResult<ChangeSet> {
        let task = self
            .plans
            .find_task(task_id)
            .await?
            .ok_or(PlanDomainError::TaskNotFound(task_id))?;
        let phase = self
            .plans
            .find_phase(destination.phase_id())
            .await?
            .ok_or(PlanDomainError::PhaseNotFound(destination.phase_id()))?;

        let cross_project = task.project_id() != phase.project_id();
        let _guard = if cross_project && destination.allows_cross_project() {
            let guard = self.locks.lock(task.project_id()).await;
            self.ensure_unlinked(&task).await?;
            Some(guard)
        } else {
            None
        };

        let plan = self.plans.load_plan(phase.project_id()).await?;
        let mut statuses = self.reference.project_statuses(phase.project_id()).await?;
        if cross_project {
            statuses.extend(self.reference.project_statuses(task.project_id()).await?);
        }

        let changes = plan.plan_move(&task, &destination, &statuses, &*self.clock)?;
        self.persist(&changes).await?;
        tracing::debug!(
            task_id = %task_id,
            phase_id = %destination.phase_id(),
            changed = changes.len(),
            "moved task"
        );
        Ok(changes)
    }

    /// Reassigns contiguous order keys to a column in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`PlanServiceError`](super::PlanServiceError) when the phase
    /// is unknown, `ordered` does not match the column, or persistence fails.
    pub async fn bulk_reorder(
        &self,
        phase_id: PhaseId,
        status_id: StatusId,
        ordered: &[TaskId],
    ) -> PlanServiceResult<ChangeSet> {
        let phase = self
            .plans
            .find_phase(phase_id)
            .await?
            .ok_or(PlanDomainError::PhaseNotFound(phase_id))?;
        let plan = self.plans.load_plan(phase.project_id()).await?;
        let changes = plan.plan_bulk_reorder(phase_id, status_id, ordered, &*self.clock)?;
        self.persist(&changes).await?;
        tracing::debug!(
            phase_id = %phase_id,
            status_id = %status_id,
            changed = changes.len(),
            "bulk reordered column"
        );
        Ok(changes)
    }

    async fn ensure_unlinked(&self, task: &Task) -> PlanServiceResult<()> {
        let linked = self.dependencies.dependencies_for_task(task.id()).await?;
        if linked.is_empty() {
            return Ok(());
        }
        tracing::debug!(
            task_id = %task.id(),
            project_id = %task.project_id(),
            dependencies = linked.len(),
            "rejected cross-project move of linked task"
        );
        Err(PlanDomainError::LinkedTaskMove {
            task: task.id(),
            dependencies: linked.len(),
        }
        .into())
    }

    async fn persist(&self, changes: &ChangeSet) -> PlanServiceResult<()> {
        for change in changes {
            self.plans.save_task(&change.task).await?;
        }
        Ok(())
    }
}
