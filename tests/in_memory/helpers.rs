//! Shared fixtures wiring every service to one set of in-memory adapters.

use std::sync::Arc;

use eyre::WrapErr;
use mockable::DefaultClock;
use planwright::{
    dependency::{adapters::memory::InMemoryDependencyRepository, services::DependencyService},
    import::services::ImportReconciler,
    project::{
        adapters::memory::{InMemoryPlanRepository, InMemoryReferenceData},
        domain::{NewPhase, NewTask, Phase, ProjectId, ProjectPlan, ProjectStatus, StatusId, Task},
        ports::PlanRepository,
        services::{PlanningService, ReorderCoordinator},
    },
};
use rstest::fixture;

/// Every service of the crate over shared in-memory state.
pub struct Workspace {
    pub plans: Arc<InMemoryPlanRepository>,
    pub reference: Arc<InMemoryReferenceData>,
    pub planning: PlanningService<InMemoryPlanRepository, InMemoryReferenceData, DefaultClock>,
    pub edges: Arc<InMemoryDependencyRepository>,
    pub reorder: ReorderCoordinator<
        InMemoryPlanRepository,
        InMemoryReferenceData,
        InMemoryDependencyRepository,
        DefaultClock,
    >,
    pub dependencies:
        DependencyService<InMemoryPlanRepository, InMemoryDependencyRepository, DefaultClock>,
    pub importer: ImportReconciler<InMemoryPlanRepository, InMemoryReferenceData, DefaultClock>,
    pub project_id: ProjectId,
    pub todo: StatusId,
    pub doing: StatusId,
}

/// Provides a project with `Todo` and `Doing` statuses.
#[fixture]
pub fn workspace() -> Workspace {
    let plans = Arc::new(InMemoryPlanRepository::new());
    let reference = Arc::new(InMemoryReferenceData::new());
    let clock = Arc::new(DefaultClock);
    let project_id = ProjectId::new();
    let todo = ProjectStatus::open(project_id, "Todo");
    let doing = ProjectStatus::open(project_id, "Doing");
    let (todo_id, doing_id) = (todo.id, doing.id);
    for status in [todo, doing] {
        reference
            .add_status(status)
            .expect("status should be registered");
    }
    let edges = Arc::new(InMemoryDependencyRepository::new());
    let dependencies = DependencyService::new(Arc::clone(&plans), Arc::clone(&edges), Arc::clone(&clock));
    Workspace {
        planning: PlanningService::new(Arc::clone(&plans), Arc::clone(&reference), Arc::clone(&clock)),
        reorder: ReorderCoordinator::new(
            Arc::clone(&plans),
            Arc::clone(&reference),
            Arc::clone(&edges),
            Arc::clone(&clock),
        )
        .with_locks(dependencies.locks()),
        dependencies,
        edges,
        importer: ImportReconciler::new(Arc::clone(&plans), Arc::clone(&reference), clock),
        plans,
        reference,
        project_id,
        todo: todo_id,
        doing: doing_id,
    }
}

/// Creates a phase holding one `Todo` task per name, in order.
///
/// # Errors
///
/// Returns an error when a phase or task cannot be created.
pub async fn seed_phase(workspace: &Workspace, phase_name: &str, task_names: &[&str]) -> eyre::Result<(Phase, Vec<Task>)> {
    let phase = workspace
        .planning
        .create_phase(workspace.project_id, NewPhase::new(phase_name))
        .await
        .wrap_err("create phase")?;
    let mut tasks = Vec::with_capacity(task_names.len());
    for name in task_names {
        let task = workspace
            .planning
            .create_task(phase.id(), workspace.todo, NewTask::new(*name))
            .await
            .wrap_err_with(|| format!("create task {name}"))?;
        tasks.push(task);
    }
    Ok((phase, tasks))
}

/// Loads the workspace project's plan.
///
/// # Errors
///
/// Returns an error when the repository fails.
pub async fn load_plan(workspace: &Workspace) -> eyre::Result<ProjectPlan> {
    workspace
        .plans
        .load_plan(workspace.project_id)
        .await
        .wrap_err("load plan")
}

/// Names of a column's tasks sorted by order key.
#[must_use]
pub fn names_by_key(plan: &ProjectPlan, phase: &Phase, status_id: StatusId) -> Vec<String> {
    plan.column(phase.id(), status_id)
        .into_iter()
        .map(|task| task.name().to_owned())
        .collect()
}

/// Names of a column's tasks sorted by WBS code.
#[must_use]
pub fn names_by_code(plan: &ProjectPlan, phase: &Phase, status_id: StatusId) -> Vec<String> {
    let mut column = plan.column(phase.id(), status_id);
    column.sort_by(|left, right| left.wbs_code().cmp(right.wbs_code()));
    column
        .into_iter()
        .map(|task| task.name().to_owned())
        .collect()
}
