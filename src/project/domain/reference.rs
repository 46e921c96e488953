//! Reference data owned by the surrounding application.
//!
//! Users, statuses, priorities, and services are looked up through the
//! [`ReferenceDataSource`](crate::project::ports::ReferenceDataSource) port;
//! the engine only reads them, apart from creating statuses during import
//! reconciliation.

use super::{PriorityId, ProjectId, ServiceId, StatusId, UserId};
use serde::{Deserialize, Serialize};

/// A user that can be assigned to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    /// User identifier.
    pub id: UserId,
    /// Display name used for matching imported assignee names.
    pub name: String,
}

impl UserRef {
    /// Creates a user reference with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
        }
    }
}

/// A status column of a project board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStatus {
    /// Status identifier.
    pub id: StatusId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Column name.
    pub name: String,
    /// Whether tasks in this column count as finished.
    pub is_closed: bool,
}

impl ProjectStatus {
    /// Creates an open status with a fresh identifier.
    #[must_use]
    pub fn open(project_id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id: StatusId::new(),
            project_id,
            name: name.into(),
            is_closed: false,
        }
    }

    /// Creates a closed status with a fresh identifier.
    #[must_use]
    pub fn closed(project_id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            is_closed: true,
            ..Self::open(project_id, name)
        }
    }
}

/// A task priority level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    /// Priority identifier.
    pub id: PriorityId,
    /// Priority name.
    pub name: String,
}

impl Priority {
    /// Creates a priority with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PriorityId::new(),
            name: name.into(),
        }
    }
}

/// A service tasks can be billed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRef {
    /// Service identifier.
    pub id: ServiceId,
    /// Service name.
    pub name: String,
}

impl ServiceRef {
    /// Creates a service reference with a fresh identifier.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ServiceId::new(),
            name: name.into(),
        }
    }
}

/// Returns `true` when two display names refer to the same entity.
///
/// Names match case-insensitively after trimming surrounding whitespace.
#[must_use]
pub fn names_match(left: &str, right: &str) -> bool {
    normalize_name(left) == normalize_name(right)
}

/// Returns the canonical form of a display name used as a lookup key.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
