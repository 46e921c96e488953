//! CSV imports into projects that already hold phases and tasks.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::in_memory::helpers::{Workspace, load_plan, names_by_key, seed_phase, workspace};
use eyre::{WrapErr, eyre};
use mockable::DefaultClock;
use planwright::{
    import::{
        ImportConfig,
        domain::{AgentResolution, ImportAbort, ImportStage, StatusResolution},
        services::ImportReconciler,
    },
    project::{domain::UserRef, ports::ReferenceDataSource},
};
use rstest::rstest;

const UPLOAD: &str = "\
Phase,Task,Assigned To,Status,Estimated Hours,Tags
Planning,Design,Alice,Doing,4,\"ui, ux\"
Planning,Review,\"Alice, Bob\",,2,
Launch,Deploy,Bob,Shipped,,
";

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn import_extends_an_existing_plan(workspace: Workspace) -> eyre::Result<()> {
    let (planning, _) = seed_phase(&workspace, "Planning", &["Kickoff"]).await?;
    let alice = UserRef::new("Alice");
    let carol = UserRef::new("Carol");
    for user in [&alice, &carol] {
        workspace.reference.add_user(user.clone()).wrap_err("add user")?;
    }
    let importer = &workspace.importer;
    let mut session = importer.start(workspace.project_id);

    importer.upload(&mut session, UPLOAD).wrap_err("upload")?;
    importer.preview(&mut session).await.wrap_err("preview")?;
    assert_eq!(session.advance()?, ImportStage::AgentResolution);
    assert_eq!(session.unmatched_agents(), ["Bob"]);
    session.resolve_agent("Bob", AgentResolution::MapTo(carol.id))?;
    assert_eq!(session.advance()?, ImportStage::StatusResolution);
    assert_eq!(session.unmatched_statuses(), ["Shipped"]);
    session.resolve_status("Shipped", StatusResolution::CreateNew)?;
    assert_eq!(session.advance()?, ImportStage::Commit);
    let result = importer
        .commit(&mut session, &ImportAbort::new())
        .await
        .wrap_err("commit")?;

    assert_eq!(session.stage(), ImportStage::Committed);
    assert_eq!(result.phases_created, 1);
    assert_eq!(result.tasks_created, 3);
    assert!(result.errors.is_empty());

    let plan = load_plan(&workspace).await?;
    assert_eq!(names_by_key(&plan, &planning, workspace.todo), ["Kickoff", "Review"]);
    assert_eq!(names_by_key(&plan, &planning, workspace.doing), ["Design"]);
    let code_of = |name: &str| {
        plan.tasks()
            .iter()
            .find(|task| task.name() == name)
            .map(|task| task.wbs_code().to_string())
            .ok_or_else(|| eyre!("task {name} missing"))
    };
    assert_eq!(code_of("Kickoff")?, "1.1");
    assert_eq!(code_of("Design")?, "1.2");
    assert_eq!(code_of("Review")?, "1.3");
    assert_eq!(code_of("Deploy")?, "2.1");

    let design = plan
        .tasks()
        .iter()
        .find(|task| task.name() == "Design")
        .ok_or_else(|| eyre!("design missing"))?;
    assert_eq!(design.assignee(), Some(alice.id));
    assert_eq!(design.estimated_hours(), Some(4.0));
    assert_eq!(
        design.tags(),
        &BTreeSet::from(["ui".to_owned(), "ux".to_owned()])
    );
    let review = plan
        .tasks()
        .iter()
        .find(|task| task.name() == "Review")
        .ok_or_else(|| eyre!("review missing"))?;
    assert_eq!(review.assignee(), Some(alice.id));
    assert_eq!(review.resources(), &BTreeSet::from([carol.id]));

    let statuses = workspace
        .reference
        .project_statuses(workspace.project_id)
        .await
        .wrap_err("statuses")?;
    assert!(statuses.iter().any(|status| status.name == "Shipped"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lenient_import_skips_invalid_and_truncated_rows(workspace: Workspace) -> eyre::Result<()> {
    let importer = ImportReconciler::new(
        Arc::clone(&workspace.plans),
        Arc::clone(&workspace.reference),
        Arc::new(DefaultClock),
    )
    .with_config(ImportConfig::lenient().with_max_rows(2));
    let mut session = importer.start(workspace.project_id);

    importer
        .upload(&mut session, "task_name,estimated_hours\nOne,1\nTwo,-1\nThree,3\n")
        .wrap_err("upload")?;
    importer.preview(&mut session).await.wrap_err("preview")?;
    let truncation = session.truncation().ok_or_else(|| eyre!("truncation expected"))?;
    assert_eq!((truncation.original_rows, truncation.kept_rows), (3, 2));
    assert_eq!(session.invalid_count(), 1);
    while session.stage() < ImportStage::Commit {
        session.advance()?;
    }
    let result = importer
        .commit(&mut session, &ImportAbort::new())
        .await
        .wrap_err("commit")?;

    assert_eq!(result.tasks_created, 1);
    assert_eq!(result.committed_rows, BTreeSet::from([2]));
    let plan = load_plan(&workspace).await?;
    let general = plan
        .phase_by_name("General")
        .ok_or_else(|| eyre!("default phase missing"))?;
    assert_eq!(names_by_key(&plan, general, workspace.todo), ["One"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn aborted_commit_resumes_from_the_remaining_rows(workspace: Workspace) -> eyre::Result<()> {
    let importer = &workspace.importer;
    let mut session = importer.start(workspace.project_id);
    importer
        .upload(&mut session, "phase_name,task_name\nBuild,Schema\nBuild,Handlers\n")
        .wrap_err("upload")?;
    importer.preview(&mut session).await.wrap_err("preview")?;
    while session.stage() < ImportStage::Commit {
        session.advance()?;
    }
    let abort = ImportAbort::new();
    abort.abort();

    let aborted = importer.commit(&mut session, &abort).await.wrap_err("commit")?;
    assert!(aborted.aborted);
    assert_eq!(session.stage(), ImportStage::Commit);

    let remaining = aborted.remaining(&session.grouped_phases());
    let resumed = importer
        .run_import(
            workspace.project_id,
            &remaining,
            session.resolutions(),
            &ImportAbort::new(),
        )
        .await
        .wrap_err("resume")?;

    assert_eq!(resumed.tasks_created, 2);
    let plan = load_plan(&workspace).await?;
    let build = plan
        .phase_by_name("Build")
        .ok_or_else(|| eyre!("phase missing"))?;
    assert_eq!(names_by_key(&plan, build, workspace.todo), ["Schema", "Handlers"]);
    Ok(())
}
