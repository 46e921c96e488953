//! Tests for move and bulk reorder planning.

use super::fixtures::{board_with_tasks, persisted_task};
use crate::ordering::OrderKey;
use crate::project::domain::{
    ChangedField, MoveDestination, NewPhase, PlanDomainError, Position, ProjectId, ProjectPlan,
    ProjectStatus, StatusId, TaskId,
};
use mockable::DefaultClock;
use rstest::rstest;
use std::collections::BTreeSet;

fn fields(values: &[ChangedField]) -> BTreeSet<ChangedField> {
    values.iter().copied().collect()
}

#[rstest]
fn move_between_neighbours_touches_only_the_moved_task() {
    let mut plan = ProjectPlan::new(ProjectId::new());
    let phase = plan
        .append_phase(NewPhase::new("Build"), &DefaultClock)
        .expect("phase should be created");
    let todo = ProjectStatus::open(plan.project_id(), "Todo");
    let doing = ProjectStatus::open(plan.project_id(), "Doing");
    let above = persisted_task(plan.project_id(), phase.id(), doing.id, "a1", "1.1");
    let below = persisted_task(plan.project_id(), phase.id(), doing.id, "a3", "1.3");
    let moving = persisted_task(plan.project_id(), phase.id(), todo.id, "a0", "1.2");
    for task in [&above, &below, &moving] {
        plan.put_task(task.clone());
    }
    let destination = MoveDestination::new(phase.id())
        .with_status(doing.id)
        .with_position(Position::Between {
            previous: Some(above.id()),
            next: Some(below.id()),
        });

    let changes = plan
        .plan_move(&moving, &destination, &[todo, doing.clone()], &DefaultClock)
        .expect("move should be planned");

    assert_eq!(changes.len(), 1);
    let change = changes.get(moving.id()).expect("moved task is reported");
    assert_eq!(change.task.order_key().as_str(), "a2");
    assert_eq!(change.task.status_id(), doing.id);
    assert_eq!(change.task.wbs_code().to_string(), "1.2");
    assert_eq!(change.fields, fields(&[ChangedField::Status, ChangedField::OrderKey]));
    assert!(changes.get(above.id()).is_none());
    assert!(changes.get(below.id()).is_none());
}

#[rstest]
fn move_to_start_reallocates_code_below_first_task() {
    let board = board_with_tasks(3);
    let last = board.tasks.get(2).expect("third task");
    let first = board.tasks.first().expect("first task");
    let destination = MoveDestination::new(board.phase.id()).with_position(Position::Start);

    let changes = board
        .plan
        .plan_move(last, &destination, &[], &DefaultClock)
        .expect("move should be planned");

    let change = changes.get(last.id()).expect("moved task is reported");
    assert!(change.task.order_key() < first.order_key());
    assert!(change.task.wbs_code() < first.wbs_code());
    assert_eq!(change.task.wbs_code().to_string(), "1.0.1");
    assert_eq!(change.fields, fields(&[ChangedField::OrderKey, ChangedField::WbsCode]));
}

#[rstest]
#[case::between_current_neighbours(1, Position::Between { previous: None, next: None })]
#[case::end_for_last_task(2, Position::End)]
#[case::start_for_first_task(0, Position::Start)]
fn move_into_current_slot_is_a_no_op(#[case] index: usize, #[case] position: Position) {
    let board = board_with_tasks(3);
    let task = board.tasks.get(index).expect("task exists");
    let resolved = match position {
        Position::Between { .. } => Position::Between {
            previous: board.tasks.first().map(|first| first.id()),
            next: board.tasks.get(2).map(|last| last.id()),
        },
        other => other,
    };
    let destination = MoveDestination::new(board.phase.id()).with_position(resolved);

    let changes = board
        .plan
        .plan_move(task, &destination, &[], &DefaultClock)
        .expect("move should be planned");

    assert!(changes.is_empty());
}

#[rstest]
fn move_infers_missing_previous_neighbour() {
    let board = board_with_tasks(3);
    let moving = board.tasks.first().expect("first task");
    let last = board.tasks.get(2).expect("third task");
    let middle = board.tasks.get(1).expect("second task");
    let destination = MoveDestination::new(board.phase.id()).with_position(Position::Between {
        previous: None,
        next: Some(last.id()),
    });

    let changes = board
        .plan
        .plan_move(moving, &destination, &[], &DefaultClock)
        .expect("move should be planned");

    let moved = &changes.get(moving.id()).expect("moved task").task;
    assert!(middle.order_key() < moved.order_key() && moved.order_key() < last.order_key());
    assert!(middle.wbs_code() < moved.wbs_code() && moved.wbs_code() < last.wbs_code());
}

#[rstest]
fn move_rejects_unknown_neighbour() {
    let board = board_with_tasks(2);
    let stranger = TaskId::new();
    let task = board.tasks.first().expect("task exists");
    let destination = MoveDestination::new(board.phase.id()).with_position(Position::Between {
        previous: Some(stranger),
        next: None,
    });

    let result = board.plan.plan_move(task, &destination, &[], &DefaultClock);

    assert_eq!(result, Err(PlanDomainError::NeighborNotInColumn(stranger)));
}

#[rstest]
fn move_rejects_neighbours_that_are_not_adjacent() {
    let board = board_with_tasks(4);
    let moving = board.tasks.get(3).expect("fourth task");
    let first = board.tasks.first().expect("first task");
    let third = board.tasks.get(2).expect("third task");
    let destination = MoveDestination::new(board.phase.id()).with_position(Position::Between {
        previous: Some(first.id()),
        next: Some(third.id()),
    });

    let result = board.plan.plan_move(moving, &destination, &[], &DefaultClock);

    assert_eq!(
        result,
        Err(PlanDomainError::NeighborsNotAdjacent {
            previous: first.id(),
            next: third.id(),
        })
    );
}

#[rstest]
fn move_rejects_stale_order_key() {
    let board = board_with_tasks(2);
    let task = board.tasks.first().expect("task exists");
    let stale = OrderKey::parse("a5").expect("valid key");
    let destination = MoveDestination::new(board.phase.id())
        .with_position(Position::End)
        .expecting_order_key(stale.clone());

    let result = board.plan.plan_move(task, &destination, &[], &DefaultClock);

    assert_eq!(
        result,
        Err(PlanDomainError::StaleOrder {
            expected: stale,
            actual: task.order_key().clone(),
        })
    );
}

#[rstest]
fn move_rejects_status_of_another_project() {
    let board = board_with_tasks(1);
    let task = board.tasks.first().expect("task exists");
    let foreign = ProjectStatus::open(ProjectId::new(), "Doing");
    let destination = MoveDestination::new(board.phase.id()).with_status(foreign.id);

    let result = board
        .plan
        .plan_move(task, &destination, &[foreign.clone()], &DefaultClock);

    assert_eq!(result, Err(PlanDomainError::UnknownStatus(foreign.id)));
}

#[rstest]
fn move_to_another_phase_takes_destination_prefix() {
    let mut board = board_with_tasks(2);
    let target = board
        .plan
        .append_phase(NewPhase::new("Launch"), &DefaultClock)
        .expect("phase should be created");
    let task = board.tasks.get(1).expect("task exists");

    let changes = board
        .plan
        .plan_move(task, &MoveDestination::new(target.id()), &[], &DefaultClock)
        .expect("move should be planned");

    let change = changes.get(task.id()).expect("moved task");
    assert_eq!(change.task.phase_id(), target.id());
    assert_eq!(change.task.status_id(), board.status);
    assert_eq!(change.task.order_key().as_str(), "a0");
    assert_eq!(change.task.wbs_code().to_string(), "2.1");
    assert_eq!(
        change.fields,
        fields(&[ChangedField::Phase, ChangedField::OrderKey, ChangedField::WbsCode])
    );
}

#[rstest]
fn cross_project_move_requires_confirmation() {
    let source = board_with_tasks(1);
    let target = board_with_tasks(0);
    let task = source.tasks.first().expect("task exists");

    let result = target.plan.plan_move(
        task,
        &MoveDestination::new(target.phase.id()),
        &[],
        &DefaultClock,
    );

    assert_eq!(
        result,
        Err(PlanDomainError::CrossProjectMove {
            task: task.id(),
            destination: target.plan.project_id(),
        })
    );
}

#[rstest]
#[case::same_name_status("Doing", "Doing")]
#[case::first_open_status("Blocked", "Todo")]
fn confirmed_cross_project_move_remaps_status(#[case] source_name: &str, #[case] expected: &str) {
    let source = board_with_tasks(0);
    let target = board_with_tasks(0);
    let source_status = ProjectStatus::open(source.plan.project_id(), source_name);
    let task = persisted_task(
        source.plan.project_id(),
        source.phase.id(),
        source_status.id,
        "a0",
        "1.1",
    );
    let statuses = vec![
        ProjectStatus::closed(target.plan.project_id(), "Done"),
        ProjectStatus::open(target.plan.project_id(), "Todo"),
        ProjectStatus::open(target.plan.project_id(), "Doing"),
        source_status,
    ];

    let changes = target
        .plan
        .plan_move(
            &task,
            &MoveDestination::new(target.phase.id()).allowing_cross_project(),
            &statuses,
            &DefaultClock,
        )
        .expect("move should be planned");

    let moved = &changes.get(task.id()).expect("moved task").task;
    let status_name = statuses
        .iter()
        .find(|status| status.id == moved.status_id())
        .map(|status| status.name.as_str());
    assert_eq!(status_name, Some(expected));
    assert_eq!(moved.project_id(), target.plan.project_id());
    assert_eq!(moved.phase_id(), target.phase.id());
}

#[rstest]
fn bulk_reorder_assigns_contiguous_keys_and_redistributes_codes() {
    let board = board_with_tasks(3);
    let [first, second, third] = board.tasks.as_slice() else {
        panic!("board should hold three tasks");
    };
    let reordered = [third.id(), first.id(), second.id()];

    let changes = board
        .plan
        .plan_bulk_reorder(board.phase.id(), board.status, &reordered, &DefaultClock)
        .expect("reorder should be planned");

    let placed: Vec<(String, String)> = reordered
        .iter()
        .map(|id| {
            let task = &changes.get(*id).expect("every task moved").task;
            (task.order_key().to_string(), task.wbs_code().to_string())
        })
        .collect();
    assert_eq!(
        placed,
        vec![
            ("a0".to_owned(), "1.1".to_owned()),
            ("a1".to_owned(), "1.2".to_owned()),
            ("a2".to_owned(), "1.3".to_owned()),
        ]
    );
}

#[rstest]
fn bulk_reorder_in_current_order_changes_nothing() {
    let board = board_with_tasks(3);
    let ids: Vec<TaskId> = board.tasks.iter().map(|task| task.id()).collect();

    let changes = board
        .plan
        .plan_bulk_reorder(board.phase.id(), board.status, &ids, &DefaultClock)
        .expect("reorder should be planned");

    assert!(changes.is_empty());
}

#[rstest]
#[case::missing_task(vec![0, 1], 2, 3)]
#[case::duplicated_task(vec![0, 0, 1, 2], 3, 3)]
fn bulk_reorder_rejects_lists_that_differ_from_the_column(
    #[case] indices: Vec<usize>,
    #[case] listed: usize,
    #[case] actual: usize,
) {
    let board = board_with_tasks(3);
    let ordered: Vec<TaskId> = indices
        .iter()
        .filter_map(|index| board.tasks.get(*index).map(|task| task.id()))
        .collect();

    let result = board
        .plan
        .plan_bulk_reorder(board.phase.id(), board.status, &ordered, &DefaultClock);

    assert_eq!(result, Err(PlanDomainError::BulkMismatch { listed, actual }));
}

#[rstest]
fn applied_changes_keep_column_order_consistent() {
    let mut board = board_with_tasks(4);
    let moving = board.tasks.first().expect("first task").clone();
    let destination = MoveDestination::new(board.phase.id()).with_position(Position::Between {
        previous: board.tasks.get(2).map(|task| task.id()),
        next: None,
    });

    let changes = board
        .plan
        .plan_move(&moving, &destination, &[], &DefaultClock)
        .expect("move should be planned");
    board.plan.apply(&changes);

    let column = board.plan.column(board.phase.id(), board.status);
    let by_key: Vec<TaskId> = column.iter().map(|task| task.id()).collect();
    let mut by_code = column.clone();
    by_code.sort_by(|left, right| left.wbs_code().cmp(right.wbs_code()));
    let by_code_ids: Vec<TaskId> = by_code.iter().map(|task| task.id()).collect();
    assert_eq!(by_key, by_code_ids);
    assert_eq!(by_key.get(3), board.tasks.get(3).map(|task| task.id()).as_ref());
    assert_eq!(by_key.get(2), Some(&moving.id()));
}

#[rstest]
fn unknown_status_in_destination_keeps_board_untouched() {
    let board = board_with_tasks(2);
    let task = board.tasks.first().expect("task exists");
    let missing = StatusId::new();

    let result = board.plan.plan_move(
        task,
        &MoveDestination::new(board.phase.id()).with_status(missing),
        &[],
        &DefaultClock,
    );

    assert_eq!(result, Err(PlanDomainError::UnknownStatus(missing)));
    assert_eq!(board.plan.task(task.id()), Some(task));
}
