//! Resolutions chosen for unmatched assignee and status names.

use crate::project::domain::{StatusId, UserId, normalize_name};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What to do with an assignee name that matched no user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "user_id", rename_all = "snake_case")]
pub enum AgentResolution {
    /// Drop the name from every row.
    Skip,
    /// Treat the name as this user.
    MapTo(UserId),
}

/// What to do with a status name that matched no project status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "status_id", rename_all = "snake_case")]
pub enum StatusResolution {
    /// Create a status with this name in the project.
    CreateNew,
    /// Use the reserved fallback status, creating it if absent.
    Unspecified,
    /// Use this existing status.
    MapTo(StatusId),
}

/// Resolutions keyed by normalized name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResolutions {
    agents: BTreeMap<String, AgentResolution>,
    statuses: BTreeMap<String, StatusResolution>,
}

impl ImportResolutions {
    /// Creates an empty set of resolutions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records how an assignee name is resolved, replacing any earlier
    /// choice.
    pub fn resolve_agent(&mut self, name: &str, resolution: AgentResolution) {
        self.agents.insert(normalize_name(name), resolution);
    }

    /// Builder form of [`Self::resolve_agent`].
    #[must_use]
    pub fn with_agent(mut self, name: &str, resolution: AgentResolution) -> Self {
        self.resolve_agent(name, resolution);
        self
    }

    /// Looks up the resolution for an assignee name.
    #[must_use]
    pub fn agent(&self, name: &str) -> Option<AgentResolution> {
        self.agents.get(&normalize_name(name)).copied()
    }

    /// Records how a status name is resolved, replacing any earlier choice.
    pub fn resolve_status(&mut self, name: &str, resolution: StatusResolution) {
        self.statuses.insert(normalize_name(name), resolution);
    }

    /// Builder form of [`Self::resolve_status`].
    #[must_use]
    pub fn with_status(mut self, name: &str, resolution: StatusResolution) -> Self {
        self.resolve_status(name, resolution);
        self
    }

    /// Looks up the resolution for a status name.
    #[must_use]
    pub fn status(&self, name: &str) -> Option<StatusResolution> {
        self.statuses.get(&normalize_name(name)).copied()
    }
}
