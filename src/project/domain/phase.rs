//! Phase entity: an ordered, coded group of tasks inside a project.

use super::{PhaseId, PlanDomainError, ProjectId, names_match};
use crate::ordering::{OrderKey, WbsCode};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Caller-supplied attributes for a phase that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPhase {
    name: String,
    description: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl NewPhase {
    /// Creates phase attributes with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            start_date: None,
            end_date: None,
        }
    }

    /// Sets the phase description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the planned start date.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Sets the planned end date.
    #[must_use]
    pub const fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Returns the requested name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A phase of a project.
///
/// Phases are ordered by [`OrderKey`] and carry a top-level [`WbsCode`] that
/// prefixes the codes of their tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    id: PhaseId,
    project_id: ProjectId,
    name: String,
    description: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    order_key: OrderKey,
    wbs_code: WbsCode,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedPhaseData {
    /// Persisted phase identifier.
    pub id: PhaseId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Phase name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Planned start date.
    pub start_date: Option<NaiveDate>,
    /// Planned end date.
    pub end_date: Option<NaiveDate>,
    /// Position among the project's phases.
    pub order_key: OrderKey,
    /// Display code.
    pub wbs_code: WbsCode,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Phase {
    /// Creates a new phase at the given position.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::EmptyPhaseName`] when the name is blank or
    /// [`PlanDomainError::InvalidDateRange`] when the end date precedes the
    /// start date.
    pub fn new(
        project_id: ProjectId,
        spec: NewPhase,
        order_key: OrderKey,
        wbs_code: WbsCode,
        clock: &impl Clock,
    ) -> Result<Self, PlanDomainError> {
        let name = spec.name.trim();
        if name.is_empty() {
            return Err(PlanDomainError::EmptyPhaseName);
        }
        if let (Some(start), Some(end)) = (spec.start_date, spec.end_date) {
            if end < start {
                return Err(PlanDomainError::InvalidDateRange { start, end });
            }
        }

        let timestamp = clock.utc();
        Ok(Self {
            id: PhaseId::new(),
            project_id,
            name: name.to_owned(),
            description: spec.description,
            start_date: spec.start_date,
            end_date: spec.end_date,
            order_key,
            wbs_code,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs a phase from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedPhaseData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            name: data.name,
            description: data.description,
            start_date: data.start_date,
            end_date: data.end_date,
            order_key: data.order_key,
            wbs_code: data.wbs_code,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the phase identifier.
    #[must_use]
    pub const fn id(&self) -> PhaseId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the phase name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the planned start date, if any.
    #[must_use]
    pub const fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Returns the planned end date, if any.
    #[must_use]
    pub const fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Returns the phase's position key.
    #[must_use]
    pub const fn order_key(&self) -> &OrderKey {
        &self.order_key
    }

    /// Returns the phase's WBS prefix.
    #[must_use]
    pub const fn wbs_code(&self) -> &WbsCode {
        &self.wbs_code
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

    /// Returns `true` when the phase carries the given display name.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}
