//! The staged import workflow.

use super::{
    AgentRef, AgentResolution, ColumnMapping, GroupedPhase, ImportError, ImportField, ImportRow,
    ImportResolutions, RawTable, ReferenceSnapshot, RowValidation, StatusRef, StatusResolution,
    Truncation, group_rows, validate_row,
};
use crate::import::ImportConfig;
use crate::project::domain::{ProjectId, normalize_name};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Stages an import session passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStage {
    /// Waiting for a file.
    Upload,
    /// Headers parsed; columns can be remapped.
    ColumnMapping,
    /// Rows validated against reference data.
    Preview,
    /// Unmatched assignee names are being resolved.
    AgentResolution,
    /// Unmatched status names are being resolved.
    StatusResolution,
    /// Ready to commit.
    Commit,
    /// Committed; the session is finished.
    Committed,
}

impl ImportStage {
    /// Returns the stage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::ColumnMapping => "column_mapping",
            Self::Preview => "preview",
            Self::AgentResolution => "agent_resolution",
            Self::StatusResolution => "status_resolution",
            Self::Commit => "commit",
            Self::Committed => "committed",
        }
    }
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one import into one project.
///
/// Every operation checks the current stage and fails with
/// [`ImportError::Stage`] when called out of order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSession {
    project_id: ProjectId,
    config: ImportConfig,
    stage: ImportStage,
    table: Option<RawTable>,
    mapping: Option<ColumnMapping>,
    reference: ReferenceSnapshot,
    validations: Vec<RowValidation>,
    resolutions: ImportResolutions,
}

impl ImportSession {
    /// Starts a session in the upload stage.
    #[must_use]
    pub fn new(project_id: ProjectId, config: ImportConfig) -> Self {
        Self {
            project_id,
            config,
            stage: ImportStage::Upload,
            table: None,
            mapping: None,
            reference: ReferenceSnapshot::default(),
            validations: Vec::new(),
            resolutions: ImportResolutions::new(),
        }
    }

    /// Returns the target project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the session configuration.
    #[must_use]
    pub const fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Returns the current stage.
    #[must_use]
    pub const fn stage(&self) -> ImportStage {
        self.stage
    }

    /// Returns the uploaded table.
    #[must_use]
    pub const fn table(&self) -> Option<&RawTable> {
        self.table.as_ref()
    }

    /// Returns the current column mapping.
    #[must_use]
    pub const fn mapping(&self) -> Option<&ColumnMapping> {
        self.mapping.as_ref()
    }

    /// Returns the truncation report of the upload, if rows were dropped.
    #[must_use]
    pub fn truncation(&self) -> Option<Truncation> {
        self.table.as_ref().and_then(|table| table.truncation)
    }

    /// Returns the per-row validation results of the last preview.
    #[must_use]
    pub fn validations(&self) -> &[RowValidation] {
        &self.validations
    }

    /// Returns the number of invalid rows in the last preview.
    #[must_use]
    pub fn invalid_count(&self) -> usize {
        self.validations.iter().filter(|row| !row.is_valid()).count()
    }

    /// Returns the resolutions chosen so far.
    #[must_use]
    pub const fn resolutions(&self) -> &ImportResolutions {
        &self.resolutions
    }

    /// Accepts a parsed upload and suggests a column mapping.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Stage`] outside the upload stage.
    pub fn upload(&mut self, table: RawTable) -> Result<&ColumnMapping, ImportError> {
        self.require(ImportStage::Upload)?;
        self.stage = ImportStage::ColumnMapping;
        let mapping = self.mapping.insert(ColumnMapping::suggest(&table.headers));
        self.table = Some(table);
        Ok(mapping)
    }

    /// Maps a field to a column, or unmaps it with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Stage`] outside the column mapping stage and
    /// [`ImportError::ColumnOutOfRange`] for a missing column.
    pub fn map_column(&mut self, field: ImportField, index: Option<usize>) -> Result<(), ImportError> {
        self.require(ImportStage::ColumnMapping)?;
        let mapping = self.mapping.as_mut().ok_or(ImportError::Stage {
            expected: ImportStage::Upload,
            actual: self.stage,
        })?;
        mapping.set(field, index)
    }

    /// Validates every row against the reference data and enters the
    /// preview stage.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Stage`] outside the column mapping stage and
    /// [`ImportError::MissingRequiredField`] when the task name is unmapped.
    pub fn preview(&mut self, reference: ReferenceSnapshot) -> Result<&[RowValidation], ImportError> {
        self.require(ImportStage::ColumnMapping)?;
        let (Some(table), Some(mapping)) = (self.table.as_ref(), self.mapping.as_ref()) else {
            return Err(ImportError::Stage {
                expected: ImportStage::Upload,
                actual: self.stage,
            });
        };
        mapping.ensure_required()?;
        self.validations = table
            .rows
            .iter()
            .map(|record| validate_row(record, mapping, &reference))
            .collect();
        self.reference = reference;
        self.stage = ImportStage::Preview;
        Ok(&self.validations)
    }

    /// Moves to the next stage once the current one is settled.
    ///
    /// Leaving the preview needs every row to be valid unless the
    /// configuration skips invalid rows. Leaving agent resolution needs a
    /// resolution for every unmatched assignee; leaving status resolution
    /// needs one for every unmatched status.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::InvalidRows`],
    /// [`ImportError::UnresolvedAgent`], [`ImportError::UnresolvedStatus`],
    /// or [`ImportError::Stage`] when the stage cannot be advanced.
    pub fn advance(&mut self) -> Result<ImportStage, ImportError> {
        let next = match self.stage {
            ImportStage::Preview => {
                let count = self.invalid_count();
                if count > 0 && !self.config.skip_invalid_rows {
                    return Err(ImportError::InvalidRows { count });
                }
                ImportStage::AgentResolution
            }
            ImportStage::AgentResolution => {
                if let Some(name) = self
                    .unmatched_agents()
                    .into_iter()
                    .find(|name| self.resolutions.agent(name).is_none())
                {
                    return Err(ImportError::UnresolvedAgent(name));
                }
                ImportStage::StatusResolution
            }
            ImportStage::StatusResolution => {
                if let Some(name) = self
                    .unmatched_statuses()
                    .into_iter()
                    .find(|name| self.resolutions.status(name).is_none())
                {
                    return Err(ImportError::UnresolvedStatus(name));
                }
                ImportStage::Commit
            }
            ImportStage::Upload | ImportStage::ColumnMapping => {
                return Err(ImportError::Stage {
                    expected: ImportStage::Preview,
                    actual: self.stage,
                });
            }
            ImportStage::Commit | ImportStage::Committed => {
                return Err(ImportError::Stage {
                    expected: ImportStage::StatusResolution,
                    actual: self.stage,
                });
            }
        };
        self.stage = next;
        Ok(next)
    }

    /// Lists assignee names of valid rows that matched no user, first
    /// spelling first.
    #[must_use]
    pub fn unmatched_agents(&self) -> Vec<String> {
        distinct_names(self.valid_rows().flat_map(|row| {
            row.assignees.iter().filter_map(|agent| match agent {
                AgentRef::Unmatched { name } => Some(name.as_str()),
                AgentRef::Matched { .. } => None,
            })
        }))
    }

    /// Lists status names of valid rows that matched no project status.
    #[must_use]
    pub fn unmatched_statuses(&self) -> Vec<String> {
        distinct_names(self.valid_rows().filter_map(|row| match &row.status {
            Some(StatusRef::Unmatched { name }) => Some(name.as_str()),
            Some(StatusRef::Matched { .. }) | None => None,
        }))
    }

    /// Resolves an unmatched assignee name.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Stage`] outside agent resolution and
    /// [`ImportError::UnknownUser`] when mapping to a user missing from the
    /// reference data.
    pub fn resolve_agent(&mut self, name: &str, resolution: AgentResolution) -> Result<(), ImportError> {
        self.require(ImportStage::AgentResolution)?;
        if let AgentResolution::MapTo(user_id) = resolution {
            if !self.reference.users.iter().any(|user| user.id == user_id) {
                return Err(ImportError::UnknownUser(user_id));
            }
        }
        self.resolutions.resolve_agent(name, resolution);
        Ok(())
    }

    /// Resolves an unmatched status name.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Stage`] outside status resolution and
    /// [`ImportError::UnknownStatus`] when mapping to a status the project
    /// does not have.
    pub fn resolve_status(&mut self, name: &str, resolution: StatusResolution) -> Result<(), ImportError> {
        self.require(ImportStage::StatusResolution)?;
        if let StatusResolution::MapTo(status_id) = resolution {
            if !self.reference.statuses.iter().any(|status| status.id == status_id) {
                return Err(ImportError::UnknownStatus(status_id));
            }
        }
        self.resolutions.resolve_status(name, resolution);
        Ok(())
    }

    /// Groups the valid rows into phases.
    #[must_use]
    pub fn grouped_phases(&self) -> Vec<GroupedPhase> {
        group_rows(self.valid_rows().cloned(), &self.config.default_phase_name)
    }

    /// Finishes the session after a complete commit.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Stage`] outside the commit stage.
    pub fn mark_committed(&mut self) -> Result<(), ImportError> {
        self.require(ImportStage::Commit)?;
        self.stage = ImportStage::Committed;
        Ok(())
    }

    fn valid_rows(&self) -> impl Iterator<Item = &ImportRow> + '_ {
        self.validations.iter().filter_map(|validation| validation.row.as_ref())
    }

    fn require(&self, expected: ImportStage) -> Result<(), ImportError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(ImportError::Stage {
                expected,
                actual: self.stage,
            })
        }
    }
}

fn distinct_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .filter(|name| seen.insert(normalize_name(name)))
        .map(str::to_owned)
        .collect()
}
