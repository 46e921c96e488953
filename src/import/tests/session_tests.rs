//! Stage enforcement and resolution bookkeeping of import sessions.

use crate::import::ImportConfig;
use crate::import::adapters::parse_csv;
use crate::import::domain::{
    AgentResolution, ImportError, ImportField, ImportSession, ImportStage, RawTable,
    ReferenceSnapshot, StatusResolution,
};
use crate::project::domain::{ProjectId, ProjectStatus, StatusId, UserId, UserRef};
use rstest::{fixture, rstest};

const UPLOAD: &str = "\
Phase,Task,Assigned To,Status
Planning,Design,Alice,Todo
Planning,Build,\"Bob, Alice\",Blocked
,Deploy,carol,
";

struct Context {
    project_id: ProjectId,
    alice: UserRef,
    todo: ProjectStatus,
}

#[fixture]
fn context() -> Context {
    let project_id = ProjectId::new();
    Context {
        project_id,
        alice: UserRef::new("Alice"),
        todo: ProjectStatus::open(project_id, "Todo"),
    }
}

fn table(input: &str) -> RawTable {
    parse_csv(input.as_bytes(), 100).expect("upload should parse")
}

fn snapshot(context: &Context) -> ReferenceSnapshot {
    ReferenceSnapshot {
        users: vec![context.alice.clone()],
        statuses: vec![context.todo.clone()],
        ..ReferenceSnapshot::default()
    }
}

fn previewed(context: &Context, config: ImportConfig, input: &str) -> ImportSession {
    let mut session = ImportSession::new(context.project_id, config);
    session.upload(table(input)).expect("upload stage");
    session.preview(snapshot(context)).expect("preview should run");
    session
}

#[rstest]
fn upload_suggests_a_mapping(context: Context) {
    let mut session = ImportSession::new(context.project_id, ImportConfig::default());

    let mapping = session.upload(table(UPLOAD)).expect("upload stage");

    assert_eq!(mapping.column(ImportField::PhaseName), Some(0));
    assert_eq!(mapping.column(ImportField::TaskName), Some(1));
    assert_eq!(mapping.column(ImportField::AssignedTo), Some(2));
    assert_eq!(mapping.column(ImportField::Status), Some(3));
    assert_eq!(session.stage(), ImportStage::ColumnMapping);
}

#[rstest]
fn out_of_order_calls_are_rejected(context: Context) {
    let mut session = ImportSession::new(context.project_id, ImportConfig::default());

    assert_eq!(
        session.preview(snapshot(&context)).map(<[_]>::len),
        Err(ImportError::Stage {
            expected: ImportStage::ColumnMapping,
            actual: ImportStage::Upload,
        })
    );
    assert_eq!(
        session.advance(),
        Err(ImportError::Stage {
            expected: ImportStage::Preview,
            actual: ImportStage::Upload,
        })
    );
    assert_eq!(
        session.resolve_agent("Bob", AgentResolution::Skip),
        Err(ImportError::Stage {
            expected: ImportStage::AgentResolution,
            actual: ImportStage::Upload,
        })
    );
    assert_eq!(
        session.mark_committed(),
        Err(ImportError::Stage {
            expected: ImportStage::Commit,
            actual: ImportStage::Upload,
        })
    );
}

#[rstest]
fn preview_requires_a_task_name_column(context: Context) {
    let mut session = ImportSession::new(context.project_id, ImportConfig::default());
    session.upload(table(UPLOAD)).expect("upload stage");
    session
        .map_column(ImportField::TaskName, None)
        .expect("mapping stage");

    let result = session.preview(snapshot(&context)).map(<[_]>::len);

    assert_eq!(result, Err(ImportError::MissingRequiredField(ImportField::TaskName)));
    assert_eq!(session.stage(), ImportStage::ColumnMapping);
}

#[rstest]
fn invalid_rows_block_unless_skipping_is_enabled(context: Context) {
    let input = "task_name,estimated_hours\nDesign,2\nBuild,-3\n";
    let mut strict = previewed(&context, ImportConfig::default(), input);
    let mut lenient = previewed(&context, ImportConfig::lenient(), input);

    assert_eq!(strict.invalid_count(), 1);
    assert_eq!(strict.advance(), Err(ImportError::InvalidRows { count: 1 }));
    assert_eq!(lenient.advance(), Ok(ImportStage::AgentResolution));
    let groups = lenient.grouped_phases();
    let rows: Vec<usize> = groups
        .iter()
        .flat_map(|group| group.rows.iter().map(|row| row.row_number))
        .collect();
    assert_eq!(rows, [2]);
}

#[rstest]
fn every_unmatched_name_must_be_resolved(context: Context) {
    let mut session = previewed(&context, ImportConfig::default(), UPLOAD);
    session.advance().expect("rows are valid");

    assert_eq!(session.unmatched_agents(), ["Bob", "carol"]);
    assert_eq!(session.unmatched_statuses(), ["Blocked"]);
    assert_eq!(session.advance(), Err(ImportError::UnresolvedAgent("Bob".to_owned())));

    session
        .resolve_agent("bob", AgentResolution::Skip)
        .expect("agent stage");
    session
        .resolve_agent("Carol", AgentResolution::MapTo(context.alice.id))
        .expect("agent stage");
    assert_eq!(session.advance(), Ok(ImportStage::StatusResolution));

    assert_eq!(
        session.advance(),
        Err(ImportError::UnresolvedStatus("Blocked".to_owned()))
    );
    session
        .resolve_status("Blocked", StatusResolution::CreateNew)
        .expect("status stage");
    assert_eq!(session.advance(), Ok(ImportStage::Commit));
    assert_eq!(session.mark_committed(), Ok(()));
    assert_eq!(session.stage(), ImportStage::Committed);
}

#[rstest]
fn resolutions_must_point_at_known_records(context: Context) {
    let mut session = previewed(&context, ImportConfig::default(), UPLOAD);
    session.advance().expect("rows are valid");
    let stranger = UserId::new();

    assert_eq!(
        session.resolve_agent("Bob", AgentResolution::MapTo(stranger)),
        Err(ImportError::UnknownUser(stranger))
    );

    session
        .resolve_agent("Bob", AgentResolution::Skip)
        .expect("agent stage");
    session
        .resolve_agent("carol", AgentResolution::Skip)
        .expect("agent stage");
    session.advance().expect("agents resolved");
    let foreign = StatusId::new();

    assert_eq!(
        session.resolve_status("Blocked", StatusResolution::MapTo(foreign)),
        Err(ImportError::UnknownStatus(foreign))
    );
    assert_eq!(
        session.resolve_status("Blocked", StatusResolution::MapTo(context.todo.id)),
        Ok(())
    );
}

#[rstest]
fn truncation_is_surfaced(context: Context) {
    let mut session = ImportSession::new(context.project_id, ImportConfig::default().with_max_rows(2));
    let input = "task_name\none\ntwo\nthree\n";
    let parsed = parse_csv(input.as_bytes(), session.config().max_rows).expect("upload should parse");

    session.upload(parsed).expect("upload stage");

    let truncation = session.truncation().expect("rows were dropped");
    assert_eq!((truncation.original_rows, truncation.kept_rows), (3, 2));
}
