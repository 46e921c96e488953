//! Orchestrates upload, preview, and commit of CSV imports.

use super::{ImportServiceError, ImportServiceResult};
use crate::import::{
    ImportConfig,
    adapters::parse_csv,
    domain::{
        AgentRef, AgentResolution, GroupedPhase, ImportAbort, ImportError, ImportResolutions,
        ImportResult, ImportRow, ImportRowError, ImportSession, ImportStage, ReferenceSnapshot,
        StatusRef, StatusResolution,
    },
};
use crate::project::{
    domain::{
        NewPhase, NewTask, PhaseId, ProjectId, ProjectPlan, ProjectStatus, StatusId, UserRef,
        names_match,
    },
    ports::{PlanRepository, ReferenceDataSource},
};
use mockable::Clock;
use std::sync::Arc;

/// Drives import sessions and commits their rows into a project.
#[derive(Clone)]
pub struct ImportReconciler<P, R, C>
where
    P: PlanRepository,
    R: ReferenceDataSource,
    C: Clock + Send + Sync,
{
    plans: Arc<P>,
    reference: Arc<R>,
    clock: Arc<C>,
    config: ImportConfig,
}

/// Mutable state of one commit run.
struct ImportRun {
    plan: ProjectPlan,
    statuses: Vec<ProjectStatus>,
    result: ImportResult,
}

impl ImportRun {
    fn fail(&mut self, row_number: usize, err: &ImportServiceError) {
        tracing::warn!(row_number, error = %err, "import row failed");
        self.result.errors.push(ImportRowError {
            row_number,
            message: err.to_string(),
        });
    }
}

impl<P, R, C> ImportReconciler<P, R, C>
where
    P: PlanRepository,
    R: ReferenceDataSource,
    C: Clock + Send + Sync,
{
    /// Creates a reconciler with the default configuration.
    #[must_use]
    pub fn new(plans: Arc<P>, reference: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            plans,
            reference,
            clock,
            config: ImportConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Starts a session for a project using this reconciler's configuration.
    #[must_use]
    pub fn start(&self, project_id: ProjectId) -> ImportSession {
        ImportSession::new(project_id, self.config.clone())
    }

    /// Parses a CSV upload into the session.
    ///
    /// Rows past the configured ceiling are dropped and reported through
    /// [`ImportSession::truncation`].
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] wrapped in [`ImportServiceError`] for empty
    /// or malformed input, or when the session is past the upload stage.
    pub fn upload(&self, session: &mut ImportSession, input: &str) -> ImportServiceResult<()> {
        let table = parse_csv(input.as_bytes(), session.config().max_rows)?;
        if let Some(truncation) = table.truncation {
            tracing::warn!(
                project_id = %session.project_id(),
                original_rows = truncation.original_rows,
                kept_rows = truncation.kept_rows,
                "import truncated to row ceiling"
            );
        }
        session.upload(table)?;
        Ok(())
    }

    /// Fetches reference data once and validates every row of the session.
    ///
    /// # Errors
    ///
    /// Returns [`ImportServiceError`] when reference data cannot be read or
    /// the session rejects the preview.
    pub async fn preview(&self, session: &mut ImportSession) -> ImportServiceResult<()> {
        let project_id = session.project_id();
        let snapshot = self.reference_snapshot(project_id).await?;
        let validations = session.preview(snapshot)?;
        let invalid = validations.iter().filter(|row| !row.is_valid()).count();
        tracing::debug!(
            project_id = %project_id,
            rows = validations.len(),
            invalid,
            "previewed import"
        );
        Ok(())
    }

    /// Captures users, the project's statuses, priorities, and services.
    ///
    /// # Errors
    ///
    /// Returns [`ImportServiceError::ReferenceData`] when a lookup fails.
    pub async fn reference_snapshot(&self, project_id: ProjectId) -> ImportServiceResult<ReferenceSnapshot> {
        Ok(ReferenceSnapshot {
            users: self.reference.users().await?,
            statuses: self.reference.project_statuses(project_id).await?,
            priorities: self.reference.priorities().await?,
            services: self.reference.services().await?,
        })
    }

    /// Commits a session that reached the commit stage.
    ///
    /// The session is marked committed unless the run was aborted; an
    /// aborted run leaves it in the commit stage so the caller can resume
    /// with [`ImportResult::remaining`].
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::Stage`] outside the commit stage and
    /// propagates the failures of [`Self::run_import`].
    pub async fn commit(&self, session: &mut ImportSession, abort: &ImportAbort) -> ImportServiceResult<ImportResult> {
        if session.stage() != ImportStage::Commit {
            return Err(ImportError::Stage {
                expected: ImportStage::Commit,
                actual: session.stage(),
            }
            .into());
        }
        let groups = session.grouped_phases();
        let result = self
            .run_import(session.project_id(), &groups, session.resolutions(), abort)
            .await?;
        if !result.aborted {
            session.mark_committed()?;
        }
        Ok(result)
    }

    /// Creates phases and tasks for grouped rows.
    ///
    /// Phases are matched by name and reused; new phases are appended to the
    /// project. Each task goes to the end of its `(phase, status)` column.
    /// A row that fails to persist is reported in
    /// [`ImportResult::errors`] and the run continues. `abort` is checked
    /// before every row.
    ///
    /// # Errors
    ///
    /// Fails before creating anything when an unmatched name has no
    /// resolution or a resolution points at an unknown user or status, and
    /// when the plan or reference data cannot be loaded.
    pub async fn run_import(
        &self,
        project_id: ProjectId,
        groups: &[GroupedPhase],
        resolutions: &ImportResolutions,
        abort: &ImportAbort,
    ) -> ImportServiceResult<ImportResult> {
        let users = self.reference.users().await?;
        let statuses = self.reference.project_statuses(project_id).await?;
        check_resolutions(groups, resolutions, &users, &statuses)?;

        let mut run = ImportRun {
            plan: self.plans.load_plan(project_id).await?,
            statuses,
            result: ImportResult::default(),
        };

        'groups: for group in groups {
            let mut phase_id = None;
            for row in &group.rows {
                if abort.is_aborted() {
                    run.result.aborted = true;
                    break 'groups;
                }
                let phase = match phase_id {
                    Some(phase) => phase,
                    None => match self.ensure_phase(&mut run, group).await {
                        Ok(phase) => *phase_id.insert(phase),
                        Err(err) => {
                            for failed in &group.rows {
                                run.fail(failed.row_number, &err);
                            }
                            continue 'groups;
                        }
                    },
                };
                if let Err(err) = self.commit_row(&mut run, phase, row, resolutions).await {
                    run.fail(row.row_number, &err);
                }
            }
        }

        let result = run.result;
        tracing::info!(
            project_id = %project_id,
            phases_created = result.phases_created,
            tasks_created = result.tasks_created,
            errors = result.errors.len(),
            aborted = result.aborted,
            "import committed"
        );
        Ok(result)
    }

    async fn ensure_phase(&self, run: &mut ImportRun, group: &GroupedPhase) -> ImportServiceResult<PhaseId> {
        if let Some(existing) = run.plan.phase_by_name(&group.name) {
            return Ok(existing.id());
        }
        let phase = run.plan.append_phase(NewPhase::new(group.name.clone()), &*self.clock)?;
        if let Err(err) = self.plans.save_phase(&phase).await {
            run.plan.remove_phase(phase.id());
            return Err(err.into());
        }
        run.result.phases_created += 1;
        tracing::debug!(
            phase_id = %phase.id(),
            wbs_code = %phase.wbs_code(),
            name = %phase.name(),
            "created import phase"
        );
        Ok(phase.id())
    }

    async fn commit_row(
        &self,
        run: &mut ImportRun,
        phase_id: PhaseId,
        row: &ImportRow,
        resolutions: &ImportResolutions,
    ) -> ImportServiceResult<()> {
        let status_id = self.status_for(run, row.status.as_ref(), resolutions).await?;
        let task = run
            .plan
            .append_task(phase_id, status_id, task_spec(row, resolutions), &*self.clock)?;
        if let Err(err) = self.plans.save_task(&task).await {
            run.plan.remove_task(task.id());
            return Err(err.into());
        }
        run.result.tasks_created += 1;
        run.result.committed_rows.insert(row.row_number);
        Ok(())
    }

    async fn status_for(
        &self,
        run: &mut ImportRun,
        status: Option<&StatusRef>,
        resolutions: &ImportResolutions,
    ) -> ImportServiceResult<StatusId> {
        match status {
            Some(StatusRef::Matched { id, .. }) => Ok(*id),
            Some(StatusRef::Unmatched { name }) => match resolutions.status(name) {
                Some(StatusResolution::MapTo(id)) => Ok(id),
                Some(StatusResolution::CreateNew) => self.find_or_create_status(run, name).await,
                Some(StatusResolution::Unspecified) | None => {
                    self.find_or_create_status(run, &self.config.unspecified_status_name)
                        .await
                }
            },
            None => {
                let first_open = run
                    .statuses
                    .iter()
                    .find(|status| !status.is_closed)
                    .map(|status| status.id);
                match first_open {
                    Some(id) => Ok(id),
                    None => {
                        self.find_or_create_status(run, &self.config.unspecified_status_name)
                            .await
                    }
                }
            }
        }
    }

    async fn find_or_create_status(&self, run: &mut ImportRun, name: &str) -> ImportServiceResult<StatusId> {
        if let Some(existing) = run.statuses.iter().find(|status| names_match(&status.name, name)) {
            return Ok(existing.id);
        }
        let created = self
            .reference
            .create_project_status(run.plan.project_id(), name)
            .await?;
        tracing::debug!(
            project_id = %created.project_id,
            status_id = %created.id,
            name = %created.name,
            "created import status"
        );
        let id = created.id;
        run.statuses.push(created);
        Ok(id)
    }
}

fn check_resolutions(
    groups: &[GroupedPhase],
    resolutions: &ImportResolutions,
    users: &[UserRef],
    statuses: &[ProjectStatus],
) -> Result<(), ImportError> {
    for row in groups.iter().flat_map(|group| &group.rows) {
        for agent in &row.assignees {
            let AgentRef::Unmatched { name } = agent else {
                continue;
            };
            match resolutions.agent(name) {
                None => return Err(ImportError::UnresolvedAgent(name.clone())),
                Some(AgentResolution::MapTo(id)) if !users.iter().any(|user| user.id == id) => {
                    return Err(ImportError::UnknownUser(id));
                }
                Some(_) => {}
            }
        }
        if let Some(StatusRef::Unmatched { name }) = &row.status {
            match resolutions.status(name) {
                None => return Err(ImportError::UnresolvedStatus(name.clone())),
                Some(StatusResolution::MapTo(id)) if !statuses.iter().any(|status| status.id == id) => {
                    return Err(ImportError::UnknownStatus(id));
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

/// Builds task attributes from a row, applying agent resolutions.
///
/// The row's first assignee is primary and the rest become resources. A
/// skipped primary leaves the task unassigned; skipped resources are omitted.
fn task_spec(row: &ImportRow, resolutions: &ImportResolutions) -> NewTask {
    let mut assignees = row.assignees.iter().map(|agent| match agent {
        AgentRef::Matched { id, .. } => Some(*id),
        AgentRef::Unmatched { name } => match resolutions.agent(name) {
            Some(AgentResolution::MapTo(id)) => Some(id),
            Some(AgentResolution::Skip) | None => None,
        },
    });

    let mut spec = NewTask::new(row.task_name.clone()).with_tags(&row.tags);
    if let Some(primary) = assignees.next().flatten() {
        spec = spec.with_assignee(primary);
    }
    spec = spec.with_resources(assignees.flatten());
    if let Some(description) = &row.description {
        spec = spec.with_description(description.clone());
    }
    if let Some(hours) = row.estimated_hours {
        spec = spec.with_estimated_hours(hours);
    }
    if let Some(hours) = row.actual_hours {
        spec = spec.with_actual_hours(hours);
    }
    if let Some(due_date) = row.due_date {
        spec = spec.with_due_date(due_date);
    }
    if let Some(priority_id) = row.priority_id {
        spec = spec.with_priority(priority_id);
    }
    if let Some(service_id) = row.service_id {
        spec = spec.with_service(service_id);
    }
    if let Some(task_type) = &row.task_type {
        spec = spec.with_task_type(task_type.clone());
    }
    spec
}
