//! Task moves and bulk reorders through the reorder coordinator.

use crate::in_memory::helpers::{Workspace, load_plan, names_by_code, names_by_key, seed_phase, workspace};
use eyre::{WrapErr, eyre};
use planwright::project::{
    domain::{ChangedField, MoveDestination, PlanDomainError, Position},
    services::PlanServiceError,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn move_between_neighbours_touches_only_the_moved_task(workspace: Workspace) -> eyre::Result<()> {
    let (phase, tasks) = seed_phase(&workspace, "Build", &["Schema", "Handlers", "Views", "Docs"]).await?;
    let [schema, handlers, views, _docs] = tasks.as_slice() else {
        return Err(eyre!("four tasks expected"));
    };

    let changes = workspace
        .reorder
        .move_task(
            schema.id(),
            MoveDestination::new(phase.id()).with_position(Position::Between {
                previous: Some(handlers.id()),
                next: Some(views.id()),
            }),
        )
        .await
        .wrap_err("move task")?;

    assert_eq!(changes.len(), 1);
    let change = changes.get(schema.id()).ok_or_else(|| eyre!("moved task missing"))?;
    assert!(change.fields.contains(&ChangedField::OrderKey));
    assert!(handlers.order_key() < change.task.order_key());
    assert!(change.task.order_key() < views.order_key());
    assert_eq!(change.task.wbs_code().to_string(), "1.2.1");

    let plan = load_plan(&workspace).await?;
    let expected = ["Handlers", "Schema", "Views", "Docs"];
    assert_eq!(names_by_key(&plan, &phase, workspace.todo), expected);
    assert_eq!(names_by_code(&plan, &phase, workspace.todo), expected);
    for untouched in [handlers, views] {
        let stored = plan
            .task(untouched.id())
            .ok_or_else(|| eyre!("neighbour missing"))?;
        assert_eq!(stored.order_key(), untouched.order_key());
        assert_eq!(stored.wbs_code(), untouched.wbs_code());
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moving_to_another_status_lands_at_the_end(workspace: Workspace) -> eyre::Result<()> {
    let (phase, tasks) = seed_phase(&workspace, "Build", &["Schema", "Handlers"]).await?;
    let [schema, handlers] = tasks.as_slice() else {
        return Err(eyre!("two tasks expected"));
    };
    for task in [schema, handlers] {
        workspace
            .reorder
            .move_task(task.id(), MoveDestination::new(phase.id()).with_status(workspace.doing))
            .await
            .wrap_err("move to doing")?;
    }

    let plan = load_plan(&workspace).await?;
    assert!(names_by_key(&plan, &phase, workspace.todo).is_empty());
    assert_eq!(names_by_key(&plan, &phase, workspace.doing), ["Schema", "Handlers"]);
    assert_eq!(names_by_code(&plan, &phase, workspace.doing), ["Schema", "Handlers"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_moves_are_rejected_without_changes(workspace: Workspace) -> eyre::Result<()> {
    let (phase, tasks) = seed_phase(&workspace, "Build", &["Schema", "Handlers"]).await?;
    let [schema, handlers] = tasks.as_slice() else {
        return Err(eyre!("two tasks expected"));
    };

    let result = workspace
        .reorder
        .move_task(
            schema.id(),
            MoveDestination::new(phase.id())
                .with_position(Position::End)
                .expecting_order_key(handlers.order_key().clone()),
        )
        .await;

    assert!(matches!(
        result,
        Err(PlanServiceError::Domain(PlanDomainError::StaleOrder { .. }))
    ));
    let plan = load_plan(&workspace).await?;
    assert_eq!(names_by_key(&plan, &phase, workspace.todo), ["Schema", "Handlers"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_reorder_redistributes_keys_and_codes(workspace: Workspace) -> eyre::Result<()> {
    let (phase, tasks) = seed_phase(&workspace, "Build", &["Schema", "Handlers", "Views"]).await?;
    let reversed: Vec<_> = tasks.iter().rev().map(|task| task.id()).collect();

    workspace
        .reorder
        .bulk_reorder(phase.id(), workspace.todo, &reversed)
        .await
        .wrap_err("bulk reorder")?;

    let plan = load_plan(&workspace).await?;
    let expected = ["Views", "Handlers", "Schema"];
    assert_eq!(names_by_key(&plan, &phase, workspace.todo), expected);
    assert_eq!(names_by_code(&plan, &phase, workspace.todo), expected);
    let codes: Vec<String> = plan
        .column(phase.id(), workspace.todo)
        .into_iter()
        .map(|task| task.wbs_code().to_string())
        .collect();
    assert_eq!(codes, ["1.1", "1.2", "1.3"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_reorder_rejects_partial_lists(workspace: Workspace) -> eyre::Result<()> {
    let (phase, tasks) = seed_phase(&workspace, "Build", &["Schema", "Handlers"]).await?;
    let partial: Vec<_> = tasks.iter().take(1).map(|task| task.id()).collect();

    let result = workspace
        .reorder
        .bulk_reorder(phase.id(), workspace.todo, &partial)
        .await;

    assert!(matches!(
        result,
        Err(PlanServiceError::Domain(PlanDomainError::BulkMismatch {
            listed: 1,
            actual: 2,
        }))
    ));
    Ok(())
}
