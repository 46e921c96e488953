//! Task entity and its placement inside a phase/status column.

use super::{
    ChangedField, PhaseId, PlanDomainError, PriorityId, ProjectId, ServiceId, StatusId, TaskId,
    UserId,
};
use crate::ordering::{OrderKey, WbsCode};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single checklist entry on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    text: String,
    completed: bool,
}

impl ChecklistItem {
    /// Creates an open checklist item.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::EmptyChecklistItem`] when the text is blank.
    pub fn new(text: impl Into<String>) -> Result<Self, PlanDomainError> {
        let raw = text.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PlanDomainError::EmptyChecklistItem);
        }
        Ok(Self {
            text: trimmed.to_owned(),
            completed: false,
        })
    }

    /// Returns the item text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the item has been ticked off.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }
}

/// Where a task sits: its phase, status column, and position markers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPlacement {
    /// Owning phase.
    pub phase_id: PhaseId,
    /// Status column.
    pub status_id: StatusId,
    /// Position inside the `(phase, status)` column.
    pub order_key: OrderKey,
    /// Display code extending the phase prefix.
    pub wbs_code: WbsCode,
}

/// Caller-supplied attributes for a task that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    name: String,
    description: Option<String>,
    assignee: Option<UserId>,
    resources: BTreeSet<UserId>,
    due_date: Option<NaiveDate>,
    estimated_hours: Option<f64>,
    actual_hours: Option<f64>,
    priority_id: Option<PriorityId>,
    service_id: Option<ServiceId>,
    task_type: Option<String>,
    checklist: Vec<ChecklistItem>,
    tags: BTreeSet<String>,
}

impl NewTask {
    /// Creates task attributes with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the primary assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Adds additional resource assignees.
    #[must_use]
    pub fn with_resources(mut self, resources: impl IntoIterator<Item = UserId>) -> Self {
        self.resources.extend(resources);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the estimated hours.
    #[must_use]
    pub const fn with_estimated_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours);
        self
    }

    /// Sets the actual hours.
    #[must_use]
    pub const fn with_actual_hours(mut self, hours: f64) -> Self {
        self.actual_hours = Some(hours);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority_id: PriorityId) -> Self {
        self.priority_id = Some(priority_id);
        self
    }

    /// Sets the service.
    #[must_use]
    pub const fn with_service(mut self, service_id: ServiceId) -> Self {
        self.service_id = Some(service_id);
        self
    }

    /// Sets the free-text task type.
    #[must_use]
    pub fn with_task_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into());
        self
    }

    /// Appends a checklist item.
    #[must_use]
    pub fn with_checklist_item(mut self, item: ChecklistItem) -> Self {
        self.checklist.push(item);
        self
    }

    /// Adds tags. Blank tags are ignored.
    #[must_use]
    pub fn with_tags<S: AsRef<str>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags.extend(
            tags.into_iter()
                .map(|tag| tag.as_ref().trim().to_owned())
                .filter(|tag| !tag.is_empty()),
        );
        self
    }

    /// Returns the requested name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A task inside a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    name: String,
    description: Option<String>,
    assignee: Option<UserId>,
    resources: BTreeSet<UserId>,
    due_date: Option<NaiveDate>,
    estimated_hours: Option<f64>,
    actual_hours: Option<f64>,
    priority_id: Option<PriorityId>,
    service_id: Option<ServiceId>,
    task_type: Option<String>,
    checklist: Vec<ChecklistItem>,
    tags: BTreeSet<String>,
    placement: TaskPlacement,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Task name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Primary assignee.
    pub assignee: Option<UserId>,
    /// Additional resource assignees.
    pub resources: BTreeSet<UserId>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Estimated hours.
    pub estimated_hours: Option<f64>,
    /// Actual hours.
    pub actual_hours: Option<f64>,
    /// Priority reference.
    pub priority_id: Option<PriorityId>,
    /// Service reference.
    pub service_id: Option<ServiceId>,
    /// Free-text task type.
    pub task_type: Option<String>,
    /// Ordered checklist.
    pub checklist: Vec<ChecklistItem>,
    /// Tag set.
    pub tags: BTreeSet<String>,
    /// Column placement.
    pub placement: TaskPlacement,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

fn validate_hours(value: Option<f64>) -> Result<Option<f64>, PlanDomainError> {
    match value {
        Some(hours) if !hours.is_finite() || hours < 0.0 => {
            Err(PlanDomainError::InvalidHours(hours.to_string()))
        }
        other => Ok(other),
    }
}

impl Task {
    /// Creates a task at the given placement.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::EmptyTaskName`] for a blank name and
    /// [`PlanDomainError::InvalidHours`] for negative or non-finite hours.
    pub fn new(
        project_id: ProjectId,
        spec: NewTask,
        placement: TaskPlacement,
        clock: &impl Clock,
    ) -> Result<Self, PlanDomainError> {
        let name = spec.name.trim();
        if name.is_empty() {
            return Err(PlanDomainError::EmptyTaskName);
        }
        let estimated_hours = validate_hours(spec.estimated_hours)?;
        let actual_hours = validate_hours(spec.actual_hours)?;

        let mut resources = spec.resources;
        if let Some(assignee) = spec.assignee {
            resources.remove(&assignee);
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            project_id,
            name: name.to_owned(),
            description: spec.description,
            assignee: spec.assignee,
            resources,
            due_date: spec.due_date,
            estimated_hours,
            actual_hours,
            priority_id: spec.priority_id,
            service_id: spec.service_id,
            task_type: spec.task_type,
            checklist: spec.checklist,
            tags: spec.tags,
            placement,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            name: data.name,
            description: data.description,
            assignee: data.assignee,
            resources: data.resources,
            due_date: data.due_date,
            estimated_hours: data.estimated_hours,
            actual_hours: data.actual_hours,
            priority_id: data.priority_id,
            service_id: data.service_id,
            task_type: data.task_type,
            checklist: data.checklist,
            tags: data.tags,
            placement: data.placement,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the primary assignee, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns the additional resource assignees.
    #[must_use]
    pub const fn resources(&self) -> &BTreeSet<UserId> {
        &self.resources
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the estimated hours, if any.
    #[must_use]
    pub const fn estimated_hours(&self) -> Option<f64> {
        self.estimated_hours
    }

    /// Returns the actual hours, if any.
    #[must_use]
    pub const fn actual_hours(&self) -> Option<f64> {
        self.actual_hours
    }

    /// Returns the priority reference, if any.
    #[must_use]
    pub const fn priority_id(&self) -> Option<PriorityId> {
        self.priority_id
    }

    /// Returns the service reference, if any.
    #[must_use]
    pub const fn service_id(&self) -> Option<ServiceId> {
        self.service_id
    }

    /// Returns the free-text task type, if any.
    #[must_use]
    pub fn task_type(&self) -> Option<&str> {
        self.task_type.as_deref()
    }

    /// Returns the ordered checklist.
    #[must_use]
    pub fn checklist(&self) -> &[ChecklistItem] {
        &self.checklist
    }

    /// Returns the tag set.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Returns the full placement.
    #[must_use]
    pub const fn placement(&self) -> &TaskPlacement {
        &self.placement
    }

    /// Returns the owning phase.
    #[must_use]
    pub const fn phase_id(&self) -> PhaseId {
        self.placement.phase_id
    }

    /// Returns the status column.
    #[must_use]
    pub const fn status_id(&self) -> StatusId {
        self.placement.status_id
    }

    /// Returns the position key inside the column.
    #[must_use]
    pub const fn order_key(&self) -> &OrderKey {
        &self.placement.order_key
    }

    /// Returns the display code.
    #[must_use]
    pub const fn wbs_code(&self) -> &WbsCode {
        &self.placement.wbs_code
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the task to `placement` and reports which fields changed.
    ///
    /// The project changes along with the phase when the move crosses
    /// projects. Nothing is touched when the placement is identical.
    pub fn set_placement(
        &mut self,
        project_id: ProjectId,
        placement: TaskPlacement,
        clock: &impl Clock,
    ) -> BTreeSet<ChangedField> {
        let mut changed = BTreeSet::new();
        if self.placement.phase_id != placement.phase_id || self.project_id != project_id {
            changed.insert(ChangedField::Phase);
        }
        if self.placement.status_id != placement.status_id {
            changed.insert(ChangedField::Status);
        }
        if self.placement.order_key != placement.order_key {
            changed.insert(ChangedField::OrderKey);
        }
        if self.placement.wbs_code != placement.wbs_code {
            changed.insert(ChangedField::WbsCode);
        }
        if !changed.is_empty() {
            self.project_id = project_id;
            self.placement = placement;
            self.updated_at = clock.utc();
        }
        changed
    }

    /// Sets or clears the primary assignee.
    ///
    /// A new assignee is removed from the resource list.
    pub fn set_assignee(&mut self, assignee: Option<UserId>, clock: &impl Clock) {
        if let Some(user) = assignee {
            self.resources.remove(&user);
        }
        self.assignee = assignee;
        self.updated_at = clock.utc();
    }

    /// Adds a resource assignee. Returns `false` when nothing changed.
    pub fn add_resource(&mut self, user: UserId, clock: &impl Clock) -> bool {
        if self.assignee == Some(user) || !self.resources.insert(user) {
            return false;
        }
        self.updated_at = clock.utc();
        true
    }

    /// Marks a checklist item as completed or open.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::ChecklistItemNotFound`] when `index` is out
    /// of range.
    pub fn set_checklist_item(
        &mut self,
        index: usize,
        completed: bool,
        clock: &impl Clock,
    ) -> Result<(), PlanDomainError> {
        let item = self
            .checklist
            .get_mut(index)
            .ok_or(PlanDomainError::ChecklistItemNotFound(index))?;
        item.completed = completed;
        self.updated_at = clock.utc();
        Ok(())
    }
}
