//! In-memory repository for phases and tasks.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{Phase, PhaseId, ProjectId, ProjectPlan, Task, TaskId},
    ports::{PlanRepository, PlanRepositoryError, PlanRepositoryResult},
};

/// Thread-safe in-memory plan repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanRepository {
    state: Arc<RwLock<InMemoryPlanState>>,
}

#[derive(Debug, Default)]
struct InMemoryPlanState {
    phases: HashMap<PhaseId, Phase>,
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryPlanRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> PlanRepositoryError {
    PlanRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn load_plan(&self, project_id: ProjectId) -> PlanRepositoryResult<ProjectPlan> {
        let state = self.state.read().map_err(lock_error)?;
        let phases = state
            .phases
            .values()
            .filter(|phase| phase.project_id() == project_id)
            .cloned()
            .collect();
        let tasks = state
            .tasks
            .values()
            .filter(|task| task.project_id() == project_id)
            .cloned()
            .collect();
        Ok(ProjectPlan::from_parts(project_id, phases, tasks))
    }

    async fn find_task(&self, id: TaskId) -> PlanRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_phase(&self, id: PhaseId) -> PlanRepositoryResult<Option<Phase>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.phases.get(&id).cloned())
    }

    async fn save_phase(&self, phase: &Phase) -> PlanRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.phases.insert(phase.id(), phase.clone());
        Ok(())
    }

    async fn save_task(&self, task: &Task) -> PlanRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if !state.phases.contains_key(&task.phase_id()) {
            return Err(PlanRepositoryError::PhaseNotFound(task.phase_id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete_task(&self, id: TaskId) -> PlanRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(PlanRepositoryError::TaskNotFound(id))
    }
}
