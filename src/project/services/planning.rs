//! Service for creating phases and tasks at the end of their lists.

use super::{PlanServiceError, PlanServiceResult};
use crate::project::{
    domain::{NewPhase, NewTask, Phase, PhaseId, PlanDomainError, ProjectId, StatusId, Task},
    ports::{PlanRepository, ReferenceDataSource},
};
use mockable::Clock;
use std::sync::Arc;

/// Creates phases and tasks with freshly allocated order keys and WBS codes.
#[derive(Clone)]
pub struct PlanningService<P, R, C>
where
    P: PlanRepository,
    R: ReferenceDataSource,
    C: Clock + Send + Sync,
{
    plans: Arc<P>,
    reference: Arc<R>,
    clock: Arc<C>,
}

impl<P, R, C> PlanningService<P, R, C>
where
    P: PlanRepository,
    R: ReferenceDataSource,
    C: Clock + Send + Sync,
{
    /// Creates a new planning service.
    #[must_use]
    pub const fn new(plans: Arc<P>, reference: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            plans,
            reference,
            clock,
        }
    }

    /// Appends a phase to a project.
    ///
    /// # Errors
    ///
    /// Returns [`PlanServiceError`] when validation or persistence fails.
    pub async fn create_phase(&self, project_id: ProjectId, spec: NewPhase) -> PlanServiceResult<Phase> {
        let mut plan = self.plans.load_plan(project_id).await?;
        let phase = plan.append_phase(spec, &*self.clock)?;
        self.plans.save_phase(&phase).await?;
        tracing::debug!(
            project_id = %project_id,
            phase_id = %phase.id(),
            wbs_code = %phase.wbs_code(),
            "created phase"
        );
        Ok(phase)
    }

    /// Appends a task to the end of a `(phase, status)` column.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::PhaseNotFound`] or
    /// [`PlanDomainError::UnknownStatus`] wrapped in [`PlanServiceError`]
    /// when the column does not exist, and propagates validation and
    /// persistence failures.
    pub async fn create_task(
        &self,
        phase_id: PhaseId,
        status_id: StatusId,
        spec: NewTask,
    ) -> PlanServiceResult<Task> {
        let phase = self
            .plans
            .find_phase(phase_id)
            .await?
            .ok_or(PlanDomainError::PhaseNotFound(phase_id))?;
        let statuses = self.reference.project_statuses(phase.project_id()).await?;
        if !statuses.iter().any(|status| status.id == status_id) {
            return Err(PlanServiceError::Domain(PlanDomainError::UnknownStatus(status_id)));
        }

        let mut plan = self.plans.load_plan(phase.project_id()).await?;
        let task = plan.append_task(phase_id, status_id, spec, &*self.clock)?;
        self.plans.save_task(&task).await?;
        tracing::debug!(
            task_id = %task.id(),
            phase_id = %phase_id,
            order_key = %task.order_key(),
            wbs_code = %task.wbs_code(),
            "created task"
        );
        Ok(task)
    }
}
