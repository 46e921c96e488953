//! In-memory view of one project's phases and tasks.
//!
//! [`ProjectPlan`] is the unit the engine loads, rearranges, and hands back to
//! persistence. Phases are kept sorted by order key; tasks are looked up per
//! `(phase, status)` column.

use super::{
    ChangeSet, NewPhase, NewTask, Phase, PhaseId, PlanDomainError, ProjectId, StatusId, Task,
    TaskId, TaskPlacement,
};
use crate::ordering::{OrderKey, WbsCode, code_between_unused, key_between};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// A project's phases and tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPlan {
    project_id: ProjectId,
    phases: Vec<Phase>,
    tasks: Vec<Task>,
}

impl ProjectPlan {
    /// Creates an empty plan.
    #[must_use]
    pub const fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            phases: Vec::new(),
            tasks: Vec::new(),
        }
    }

    /// Assembles a plan from loaded records.
    ///
    /// Records belonging to other projects are ignored.
    #[must_use]
    pub fn from_parts(project_id: ProjectId, phases: Vec<Phase>, tasks: Vec<Task>) -> Self {
        let mut owned_phases: Vec<Phase> = phases
            .into_iter()
            .filter(|phase| phase.project_id() == project_id)
            .collect();
        owned_phases.sort_by(|left, right| left.order_key().cmp(right.order_key()));
        let owned_tasks = tasks
            .into_iter()
            .filter(|task| task.project_id() == project_id)
            .collect();
        Self {
            project_id,
            phases: owned_phases,
            tasks: owned_tasks,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the phases in order.
    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Returns every task of the project in no particular order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Looks up a phase.
    #[must_use]
    pub fn phase(&self, phase_id: PhaseId) -> Option<&Phase> {
        self.phases.iter().find(|phase| phase.id() == phase_id)
    }

    /// Looks up a phase by display name, ignoring case.
    #[must_use]
    pub fn phase_by_name(&self, name: &str) -> Option<&Phase> {
        self.phases.iter().find(|phase| phase.has_name(name))
    }

    /// Looks up a task.
    #[must_use]
    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == task_id)
    }

    /// Returns the tasks of one `(phase, status)` column sorted by order key.
    #[must_use]
    pub fn column(&self, phase_id: PhaseId, status_id: StatusId) -> Vec<&Task> {
        let mut column: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| task.phase_id() == phase_id && task.status_id() == status_id)
            .collect();
        column.sort_by(|left, right| left.order_key().cmp(right.order_key()));
        column
    }

    /// Iterates over all tasks of a phase regardless of status.
    pub fn tasks_in_phase(&self, phase_id: PhaseId) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |task| task.phase_id() == phase_id)
    }

    /// Returns the order key for a phase appended after the last one.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::OrderKey`] when the key space is exhausted.
    pub fn next_phase_key(&self) -> Result<OrderKey, PlanDomainError> {
        Ok(key_between(self.phases.last().map(Phase::order_key), None)?)
    }

    /// Returns the WBS code for a phase appended after the last one.
    #[must_use]
    pub fn next_phase_code(&self) -> WbsCode {
        let highest = self
            .phases
            .iter()
            .filter_map(|phase| phase.wbs_code().segments().first().copied())
            .max();
        WbsCode::root(highest.map_or(1, |value| value.saturating_add(1)))
    }

    /// Returns a task code that sorts after every code already used in the
    /// phase.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::PhaseNotFound`] when the phase is unknown.
    pub fn next_task_code(&self, phase_id: PhaseId) -> Result<WbsCode, PlanDomainError> {
        self.next_task_code_excluding(phase_id, None)
    }

    fn next_task_code_excluding(
        &self,
        phase_id: PhaseId,
        exclude: Option<TaskId>,
    ) -> Result<WbsCode, PlanDomainError> {
        let prefix = self.phase_code(phase_id)?;
        let depth = prefix.depth();
        let highest = self
            .tasks_in_phase(phase_id)
            .filter(|task| Some(task.id()) != exclude)
            .map(Task::wbs_code)
            .filter(|code| code.is_descendant_of(prefix))
            .filter_map(|code| code.segments().get(depth).copied())
            .max();
        Ok(prefix.child(highest.map_or(1, |value| value.saturating_add(1))))
    }

    /// Picks a task code between two column neighbours' codes.
    ///
    /// The lower bound defaults to the phase prefix. Without an upper bound
    /// the code sorts after everything in the phase. Codes used by other
    /// tasks of the phase are skipped; `exclude` names the task being placed
    /// so its current code does not count as taken.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::PhaseNotFound`] for an unknown phase and
    /// [`PlanDomainError::Wbs`] when the bounds leave no room.
    pub fn allocate_task_code(
        &self,
        phase_id: PhaseId,
        previous: Option<&WbsCode>,
        next: Option<&WbsCode>,
        exclude: Option<TaskId>,
    ) -> Result<WbsCode, PlanDomainError> {
        let Some(upper) = next else {
            return self.next_task_code_excluding(phase_id, exclude);
        };
        let prefix = self.phase_code(phase_id)?;
        let lower = previous.unwrap_or(prefix);
        let code = code_between_unused(Some(lower), Some(upper), |candidate| {
            self.tasks_in_phase(phase_id)
                .any(|task| Some(task.id()) != exclude && task.wbs_code() == candidate)
        })?;
        Ok(code)
    }

    /// Creates a phase at the end of the project, adds it to the plan, and
    /// returns a copy for persistence.
    ///
    /// # Errors
    ///
    /// Propagates validation and key generation failures.
    pub fn append_phase(
        &mut self,
        spec: NewPhase,
        clock: &impl Clock,
    ) -> Result<Phase, PlanDomainError> {
        let order_key = self.next_phase_key()?;
        let wbs_code = self.next_phase_code();
        let phase = Phase::new(self.project_id, spec, order_key, wbs_code, clock)?;
        self.phases.push(phase.clone());
        Ok(phase)
    }

    /// Creates a task at the end of a `(phase, status)` column, adds it to
    /// the plan, and returns a copy for persistence.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::PhaseNotFound`] for an unknown phase and
    /// propagates validation and key generation failures.
    pub fn append_task(
        &mut self,
        phase_id: PhaseId,
        status_id: StatusId,
        spec: NewTask,
        clock: &impl Clock,
    ) -> Result<Task, PlanDomainError> {
        let column = self.column(phase_id, status_id);
        let last = column.last().copied();
        let order_key = key_between(last.map(Task::order_key), None)?;
        let wbs_code = self.allocate_task_code(phase_id, last.map(Task::wbs_code), None, None)?;
        let placement = TaskPlacement {
            phase_id,
            status_id,
            order_key,
            wbs_code,
        };
        let task = Task::new(self.project_id, spec, placement, clock)?;
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Inserts or replaces a phase, keeping phases sorted.
    pub fn put_phase(&mut self, phase: Phase) {
        self.phases.retain(|existing| existing.id() != phase.id());
        let index = self
            .phases
            .partition_point(|existing| existing.order_key() < phase.order_key());
        self.phases.insert(index, phase);
    }

    /// Inserts or replaces a task.
    pub fn put_task(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|existing| existing.id() == task.id()) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
    }

    /// Removes a phase from the plan. Its tasks are left in place.
    pub fn remove_phase(&mut self, phase_id: PhaseId) -> Option<Phase> {
        let index = self.phases.iter().position(|phase| phase.id() == phase_id)?;
        Some(self.phases.remove(index))
    }

    /// Removes a task from the plan.
    pub fn remove_task(&mut self, task_id: TaskId) -> Option<Task> {
        let index = self.tasks.iter().position(|task| task.id() == task_id)?;
        Some(self.tasks.swap_remove(index))
    }

    /// Writes the tasks of a change set back into the plan.
    ///
    /// Tasks that moved to another project leave this plan.
    pub fn apply(&mut self, changes: &ChangeSet) {
        for change in changes.iter() {
            if change.task.project_id() == self.project_id {
                self.put_task(change.task.clone());
            } else {
                self.remove_task(change.task.id());
            }
        }
    }

    pub(crate) fn phase_code(&self, phase_id: PhaseId) -> Result<&WbsCode, PlanDomainError> {
        self.phase(phase_id)
            .map(Phase::wbs_code)
            .ok_or(PlanDomainError::PhaseNotFound(phase_id))
    }
}
