//! Dependency edge entity.

use super::DependencyType;
use crate::project::domain::{ProjectId, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyId(Uuid);

impl DependencyId {
    /// Creates a new random dependency identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a dependency identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the wrapped UUID.
    #[must_use]
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for DependencyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DependencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Requested dependency, before validation against the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDependency {
    predecessor: TaskId,
    successor: TaskId,
    kind: DependencyType,
    lead_lag_days: Option<i32>,
    note: Option<String>,
}

impl NewDependency {
    /// Creates a request linking `predecessor` to `successor`.
    #[must_use]
    pub const fn new(predecessor: TaskId, successor: TaskId, kind: DependencyType) -> Self {
        Self {
            predecessor,
            successor,
            kind,
            lead_lag_days: None,
            note: None,
        }
    }

    /// Sets a signed lead (negative) or lag (positive) in days.
    #[must_use]
    pub const fn with_lead_lag_days(mut self, days: i32) -> Self {
        self.lead_lag_days = Some(days);
        self
    }

    /// Attaches a note. Blank notes are ignored.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let text = note.into();
        self.note = (!text.trim().is_empty()).then_some(text);
        self
    }

    /// Rewrites `blocked_by` as `blocks` with the endpoints swapped.
    #[must_use]
    pub fn normalized(self) -> Self {
        match self.kind {
            DependencyType::BlockedBy => Self {
                predecessor: self.successor,
                successor: self.predecessor,
                kind: DependencyType::Blocks,
                ..self
            },
            _ => self,
        }
    }

    /// Returns the predecessor.
    #[must_use]
    pub const fn predecessor(&self) -> TaskId {
        self.predecessor
    }

    /// Returns the successor.
    #[must_use]
    pub const fn successor(&self) -> TaskId {
        self.successor
    }

    /// Returns the relationship type.
    #[must_use]
    pub const fn kind(&self) -> DependencyType {
        self.kind
    }
}

/// A stored, validated dependency edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    id: DependencyId,
    project_id: ProjectId,
    predecessor: TaskId,
    successor: TaskId,
    kind: DependencyType,
    lead_lag_days: Option<i32>,
    note: Option<String>,
    created_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedDependencyData {
    /// Persisted identifier.
    pub id: DependencyId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Predecessor task.
    pub predecessor: TaskId,
    /// Successor task.
    pub successor: TaskId,
    /// Relationship type.
    pub kind: DependencyType,
    /// Lead or lag in days.
    pub lead_lag_days: Option<i32>,
    /// Optional note.
    pub note: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Dependency {
    pub(super) fn new(project_id: ProjectId, spec: NewDependency, clock: &impl Clock) -> Self {
        Self {
            id: DependencyId::new(),
            project_id,
            predecessor: spec.predecessor,
            successor: spec.successor,
            kind: spec.kind,
            lead_lag_days: spec.lead_lag_days,
            note: spec.note,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a dependency from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedDependencyData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            predecessor: data.predecessor,
            successor: data.successor,
            kind: data.kind,
            lead_lag_days: data.lead_lag_days,
            note: data.note,
            created_at: data.created_at,
        }
    }

    /// Returns the dependency identifier.
    #[must_use]
    pub const fn id(&self) -> DependencyId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the predecessor task.
    #[must_use]
    pub const fn predecessor(&self) -> TaskId {
        self.predecessor
    }

    /// Returns the successor task.
    #[must_use]
    pub const fn successor(&self) -> TaskId {
        self.successor
    }

    /// Returns the relationship type.
    #[must_use]
    pub const fn kind(&self) -> DependencyType {
        self.kind
    }

    /// Returns the lead or lag in days.
    #[must_use]
    pub const fn lead_lag_days(&self) -> Option<i32> {
        self.lead_lag_days
    }

    /// Returns the note, if any.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns `true` when the edge touches `task_id`.
    #[must_use]
    pub fn involves(&self, task_id: TaskId) -> bool {
        self.predecessor == task_id || self.successor == task_id
    }
}
