//! Dependency edges over tasks created through the planning service.

use crate::in_memory::helpers::{Workspace, load_plan, seed_phase, workspace};
use eyre::{WrapErr, eyre};
use planwright::{
    dependency::{
        domain::{DependencyError, DependencyLabel, DependencyType, NewDependency},
        ports::DependencyRepository,
        services::DependencyServiceError,
    },
    project::{
        domain::{MoveDestination, NewPhase, PlanDomainError, Position, ProjectId, ProjectStatus},
        ports::PlanRepository,
        services::PlanServiceError,
    },
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closing_a_cycle_is_rejected(workspace: Workspace) -> eyre::Result<()> {
    let (_, tasks) = seed_phase(&workspace, "Build", &["Design", "Code", "Test"]).await?;
    let [design, code, test] = tasks.as_slice() else {
        return Err(eyre!("three tasks expected"));
    };
    for (from, to) in [(design, code), (code, test)] {
        workspace
            .dependencies
            .add_dependency(
                workspace.project_id,
                NewDependency::new(from.id(), to.id(), DependencyType::FinishToStart),
            )
            .await
            .wrap_err("add edge")?;
    }

    let result = workspace
        .dependencies
        .add_dependency(
            workspace.project_id,
            NewDependency::new(test.id(), design.id(), DependencyType::FinishToStart),
        )
        .await;

    let path = match result {
        Err(DependencyServiceError::Graph(DependencyError::Cycle { path })) => path,
        other => return Err(eyre!("expected a cycle error, got {other:?}")),
    };
    assert_eq!(path, [test.id(), design.id(), code.id(), test.id()]);
    let incoming = workspace
        .dependencies
        .predecessors_of(design.id())
        .await
        .wrap_err("list predecessors")?;
    assert!(incoming.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blocks_is_viewed_as_blocked_by_from_the_other_side(workspace: Workspace) -> eyre::Result<()> {
    let (phase, tasks) = seed_phase(&workspace, "Build", &["Schema", "Handlers"]).await?;
    let [schema, handlers] = tasks.as_slice() else {
        return Err(eyre!("two tasks expected"));
    };
    workspace
        .dependencies
        .add_dependency(
            workspace.project_id,
            NewDependency::new(schema.id(), handlers.id(), DependencyType::Blocks).with_note("needs tables"),
        )
        .await
        .wrap_err("add edge")?;

    let incoming = workspace
        .dependencies
        .predecessors_of(handlers.id())
        .await
        .wrap_err("list predecessors")?;
    let outgoing = workspace
        .dependencies
        .successors_of(schema.id())
        .await
        .wrap_err("list successors")?;

    let [blocker] = incoming.as_slice() else {
        return Err(eyre!("one predecessor expected"));
    };
    assert_eq!(blocker.label, DependencyLabel::BlockedBy);
    assert_eq!(blocker.task.id, schema.id());
    assert_eq!(blocker.task.phase_name, phase.name());
    assert_eq!(blocker.note.as_deref(), Some("needs tables"));
    let [blocked] = outgoing.as_slice() else {
        return Err(eyre!("one successor expected"));
    };
    assert_eq!(blocked.label, DependencyLabel::Blocks);
    assert_eq!(blocked.task.id, handlers.id());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dependencies_survive_moves_and_cascade_on_delete(workspace: Workspace) -> eyre::Result<()> {
    let (phase, tasks) = seed_phase(&workspace, "Build", &["Schema", "Handlers", "Docs"]).await?;
    let [schema, handlers, docs] = tasks.as_slice() else {
        return Err(eyre!("three tasks expected"));
    };
    for (from, to) in [(schema, handlers), (handlers, docs)] {
        workspace
            .dependencies
            .add_dependency(
                workspace.project_id,
                NewDependency::new(from.id(), to.id(), DependencyType::FinishToStart),
            )
            .await
            .wrap_err("add edge")?;
    }
    workspace
        .reorder
        .move_task(docs.id(), MoveDestination::new(phase.id()).with_position(Position::Start))
        .await
        .wrap_err("move docs")?;

    let removed = workspace
        .dependencies
        .delete_task(handlers.id())
        .await
        .wrap_err("delete task")?;

    assert_eq!(removed.len(), 2);
    let plan = load_plan(&workspace).await?;
    assert!(plan.task(handlers.id()).is_none());
    for survivor in [schema, docs] {
        let incoming = workspace
            .dependencies
            .predecessors_of(survivor.id())
            .await
            .wrap_err("list predecessors")?;
        let outgoing = workspace
            .dependencies
            .successors_of(survivor.id())
            .await
            .wrap_err("list successors")?;
        assert!(incoming.is_empty() && outgoing.is_empty());
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn linked_tasks_cannot_leave_their_project(workspace: Workspace) -> eyre::Result<()> {
    let (_, tasks) = seed_phase(&workspace, "Build", &["Schema", "Handlers"]).await?;
    let [schema, handlers] = tasks.as_slice() else {
        return Err(eyre!("two tasks expected"));
    };
    let edge = workspace
        .dependencies
        .add_dependency(
            workspace.project_id,
            NewDependency::new(schema.id(), handlers.id(), DependencyType::FinishToStart),
        )
        .await
        .wrap_err("add edge")?;
    let other_project = ProjectId::new();
    workspace
        .reference
        .add_status(ProjectStatus::open(other_project, "Todo"))
        .wrap_err("add status")?;
    let target = workspace
        .planning
        .create_phase(other_project, NewPhase::new("Operations"))
        .await
        .wrap_err("create phase")?;
    let destination = MoveDestination::new(target.id()).allowing_cross_project();

    let rejected = workspace
        .reorder
        .move_task(schema.id(), destination.clone())
        .await;

    assert!(matches!(
        rejected,
        Err(PlanServiceError::Domain(PlanDomainError::LinkedTaskMove { task, dependencies: 1 }))
            if task == schema.id()
    ));
    let plan = load_plan(&workspace).await?;
    assert!(plan.task(schema.id()).is_some());
    assert!(
        workspace
            .edges
            .find_dependency(edge.id())
            .await
            .wrap_err("find edge")?
            .is_some()
    );

    workspace
        .dependencies
        .remove_dependency(edge.id())
        .await
        .wrap_err("remove edge")?;
    let changes = workspace
        .reorder
        .move_task(schema.id(), destination)
        .await
        .wrap_err("move schema")?;

    assert_eq!(changes.len(), 1);
    let moved = workspace
        .plans
        .load_plan(other_project)
        .await
        .wrap_err("load other plan")?;
    assert!(moved.task(schema.id()).is_some());
    let removed = workspace
        .dependencies
        .delete_task(schema.id())
        .await
        .wrap_err("delete moved task")?;
    assert!(removed.is_empty());
    Ok(())
}
