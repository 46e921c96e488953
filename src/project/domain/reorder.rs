//! Move and reorder planning.
//!
//! Planning is pure: it reads a [`ProjectPlan`], computes new placements, and
//! returns them as a [`ChangeSet`] without touching the plan. Callers persist
//! the change set and may [`apply`](ProjectPlan::apply) it to keep their
//! in-memory view current.

use super::{
    PhaseId, PlanDomainError, ProjectPlan, ProjectStatus, StatusId, Task, TaskId, TaskPlacement,
    names_match,
};
use crate::ordering::{OrderKey, WbsCode, key_between, keys_between};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// A placement attribute altered by a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangedField {
    /// The task moved to another phase (and possibly project).
    Phase,
    /// The task moved to another status column.
    Status,
    /// The task received a new order key.
    OrderKey,
    /// The task received a new WBS code.
    WbsCode,
}

/// One changed task and the fields that changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskChange {
    /// Task state after the change.
    pub task: Task,
    /// Fields that differ from the previous state.
    pub fields: BTreeSet<ChangedField>,
}

/// The records a move or reorder altered. Unchanged tasks never appear.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangeSet {
    changes: Vec<TaskChange>,
}

impl ChangeSet {
    /// Returns an empty change set.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Records a change; empty field sets are dropped.
    pub fn push(&mut self, task: Task, fields: BTreeSet<ChangedField>) {
        if !fields.is_empty() {
            self.changes.push(TaskChange { task, fields });
        }
    }

    /// Returns `true` when nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns the number of changed tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Iterates over the changes.
    pub fn iter(&self) -> std::slice::Iter<'_, TaskChange> {
        self.changes.iter()
    }

    /// Returns the change for `task_id`, if the task changed.
    #[must_use]
    pub fn get(&self, task_id: TaskId) -> Option<&TaskChange> {
        self.changes.iter().find(|change| change.task.id() == task_id)
    }

    /// Consumes the set and returns the changes.
    #[must_use]
    pub fn into_changes(self) -> Vec<TaskChange> {
        self.changes
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a TaskChange;
    type IntoIter = std::slice::Iter<'a, TaskChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Where inside the destination column a task should land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// Before every other task.
    Start,
    /// After every other task.
    #[default]
    End,
    /// Between two tasks. A missing neighbour is inferred from the other one;
    /// both missing means [`Position::End`].
    Between {
        /// Task directly above the drop point.
        previous: Option<TaskId>,
        /// Task directly below the drop point.
        next: Option<TaskId>,
    },
}

/// Target of a task move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveDestination {
    phase_id: PhaseId,
    status_id: Option<StatusId>,
    position: Position,
    expected_order_key: Option<OrderKey>,
    allow_cross_project: bool,
}

impl MoveDestination {
    /// Targets the end of `phase_id`, keeping the current status.
    #[must_use]
    pub const fn new(phase_id: PhaseId) -> Self {
        Self {
            phase_id,
            status_id: None,
            position: Position::End,
            expected_order_key: None,
            allow_cross_project: false,
        }
    }

    /// Sets the destination status column.
    #[must_use]
    pub const fn with_status(mut self, status_id: StatusId) -> Self {
        self.status_id = Some(status_id);
        self
    }

    /// Sets the position inside the column.
    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Rejects the move with [`PlanDomainError::StaleOrder`] unless the task
    /// still carries `order_key`.
    #[must_use]
    pub fn expecting_order_key(mut self, order_key: OrderKey) -> Self {
        self.expected_order_key = Some(order_key);
        self
    }

    /// Confirms a move into a phase of another project.
    #[must_use]
    pub const fn allowing_cross_project(mut self) -> Self {
        self.allow_cross_project = true;
        self
    }

    /// Returns the destination phase.
    #[must_use]
    pub const fn phase_id(&self) -> PhaseId {
        self.phase_id
    }

    /// Returns the requested status, if any.
    #[must_use]
    pub const fn status_id(&self) -> Option<StatusId> {
        self.status_id
    }

    /// Returns the requested position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Returns whether cross-project moves are confirmed.
    #[must_use]
    pub const fn allows_cross_project(&self) -> bool {
        self.allow_cross_project
    }
}

impl ProjectPlan {
    /// Plans moving `task` to `destination`, a phase of this plan.
    ///
    /// `task` may belong to another project when the move is confirmed as
    /// cross-project. `statuses` lists the statuses of the destination
    /// project and, for cross-project moves, of the source project too.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::StaleOrder`],
    /// [`PlanDomainError::CrossProjectMove`],
    /// [`PlanDomainError::PhaseNotFound`],
    /// [`PlanDomainError::UnknownStatus`], or a neighbour error when the move
    /// cannot be placed. No state changes on error.
    pub fn plan_move(
        &self,
        task: &Task,
        destination: &MoveDestination,
        statuses: &[ProjectStatus],
        clock: &impl Clock,
    ) -> Result<ChangeSet, PlanDomainError> {
        if let Some(expected) = &destination.expected_order_key {
            if expected != task.order_key() {
                return Err(PlanDomainError::StaleOrder {
                    expected: expected.clone(),
                    actual: task.order_key().clone(),
                });
            }
        }

        let phase_id = destination.phase_id;
        let phase_code = self.phase_code(phase_id)?;
        let cross_project = task.project_id() != self.project_id();
        if cross_project && !destination.allow_cross_project {
            return Err(PlanDomainError::CrossProjectMove {
                task: task.id(),
                destination: self.project_id(),
            });
        }

        let status_id = self.destination_status(task, destination.status_id, cross_project, statuses)?;
        let column: Vec<&Task> = self
            .column(phase_id, status_id)
            .into_iter()
            .filter(|other| other.id() != task.id())
            .collect();
        let (previous, next) = resolve_neighbors(&column, destination.position)?;

        let same_column =
            !cross_project && task.phase_id() == phase_id && task.status_id() == status_id;
        if same_column && sits_between(task.order_key(), previous, next) {
            return Ok(ChangeSet::empty());
        }

        let order_key = key_between(previous.map(Task::order_key), next.map(Task::order_key))?;
        let previous_code = previous.map(Task::wbs_code);
        let next_code = next.map(Task::wbs_code);
        let current_code = task.wbs_code();
        let keeps_code = !cross_project
            && current_code.is_descendant_of(phase_code)
            && previous_code.unwrap_or(phase_code) < current_code
            && next_code.is_none_or(|upper| current_code < upper);
        let wbs_code = if keeps_code {
            current_code.clone()
        } else {
            self.allocate_task_code(phase_id, previous_code, next_code, Some(task.id()))?
        };

        let mut moved = task.clone();
        let fields = moved.set_placement(
            self.project_id(),
            TaskPlacement {
                phase_id,
                status_id,
                order_key,
                wbs_code,
            },
            clock,
        );
        tracing::debug!(
            task_id = %task.id(),
            phase_id = %phase_id,
            status_id = %status_id,
            order_key = %moved.order_key(),
            wbs_code = %moved.wbs_code(),
            "planned task move"
        );
        let mut changes = ChangeSet::empty();
        changes.push(moved, fields);
        Ok(changes)
    }

    /// Plans giving a column's tasks fresh contiguous keys in `ordered`
    /// order.
    ///
    /// The column's existing WBS codes are redistributed in the same order,
    /// so both signals keep agreeing.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::PhaseNotFound`] for an unknown phase and
    /// [`PlanDomainError::BulkMismatch`] unless `ordered` lists exactly the
    /// column's tasks, each once.
    pub fn plan_bulk_reorder(
        &self,
        phase_id: PhaseId,
        status_id: StatusId,
        ordered: &[TaskId],
        clock: &impl Clock,
    ) -> Result<ChangeSet, PlanDomainError> {
        self.phase_code(phase_id)?;
        let column = self.column(phase_id, status_id);
        let members: HashSet<TaskId> = column.iter().map(|task| task.id()).collect();
        let listed: HashSet<TaskId> = ordered.iter().copied().collect();
        if listed.len() != ordered.len() || listed != members {
            return Err(PlanDomainError::BulkMismatch {
                listed: listed.len(),
                actual: members.len(),
            });
        }

        let keys = keys_between(None, None, ordered.len())?;
        let mut codes: Vec<WbsCode> = column.iter().map(|task| task.wbs_code().clone()).collect();
        codes.sort();

        let mut changes = ChangeSet::empty();
        for ((task_id, order_key), wbs_code) in ordered.iter().zip(keys).zip(codes) {
            let Some(task) = self.task(*task_id) else {
                return Err(PlanDomainError::TaskNotFound(*task_id));
            };
            let mut reordered = task.clone();
            let fields = reordered.set_placement(
                self.project_id(),
                TaskPlacement {
                    phase_id,
                    status_id,
                    order_key,
                    wbs_code,
                },
                clock,
            );
            changes.push(reordered, fields);
        }
        tracing::debug!(
            phase_id = %phase_id,
            status_id = %status_id,
            tasks = ordered.len(),
            changed = changes.len(),
            "planned bulk reorder"
        );
        Ok(changes)
    }

    fn destination_status(
        &self,
        task: &Task,
        requested: Option<StatusId>,
        cross_project: bool,
        statuses: &[ProjectStatus],
    ) -> Result<StatusId, PlanDomainError> {
        let project_id = self.project_id();
        let mut destination_statuses = statuses
            .iter()
            .filter(|status| status.project_id == project_id);

        if let Some(status_id) = requested {
            return destination_statuses
                .any(|status| status.id == status_id)
                .then_some(status_id)
                .ok_or(PlanDomainError::UnknownStatus(status_id));
        }
        if !cross_project {
            return Ok(task.status_id());
        }

        let current_name = statuses
            .iter()
            .find(|status| status.id == task.status_id())
            .map(|status| status.name.as_str());
        let same_name = current_name.and_then(|name| {
            statuses
                .iter()
                .filter(|status| status.project_id == project_id)
                .find(|status| names_match(&status.name, name))
        });
        same_name
            .or_else(|| destination_statuses.find(|status| !status.is_closed))
            .map(|status| status.id)
            .ok_or(PlanDomainError::UnknownStatus(task.status_id()))
    }
}

fn resolve_neighbors<'a>(
    column: &[&'a Task],
    position: Position,
) -> Result<(Option<&'a Task>, Option<&'a Task>), PlanDomainError> {
    let index_of = |task_id: TaskId| {
        column
            .iter()
            .position(|task| task.id() == task_id)
            .ok_or(PlanDomainError::NeighborNotInColumn(task_id))
    };

    match position {
        Position::Start => Ok((None, column.first().copied())),
        Position::End | Position::Between {
            previous: None,
            next: None,
        } => Ok((column.last().copied(), None)),
        Position::Between {
            previous: Some(previous_id),
            next,
        } => {
            let index = index_of(previous_id)?;
            let following = column.get(index + 1).copied();
            if let Some(next_id) = next {
                index_of(next_id)?;
                if following.map(Task::id) != Some(next_id) {
                    return Err(PlanDomainError::NeighborsNotAdjacent {
                        previous: previous_id,
                        next: next_id,
                    });
                }
            }
            Ok((column.get(index).copied(), following))
        }
        Position::Between {
            previous: None,
            next: Some(next_id),
        } => {
            let index = index_of(next_id)?;
            let preceding = index.checked_sub(1).and_then(|before| column.get(before)).copied();
            Ok((preceding, column.get(index).copied()))
        }
    }
}

fn sits_between(key: &OrderKey, previous: Option<&Task>, next: Option<&Task>) -> bool {
    previous.is_none_or(|lower| lower.order_key() < key) && next.is_none_or(|upper| key < upper.order_key())
}
