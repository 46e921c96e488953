//! Shared builders for project tests.

use crate::ordering::{OrderKey, WbsCode};
use crate::project::domain::{
    NewPhase, NewTask, Phase, PhaseId, PersistedTaskData, ProjectId, ProjectPlan, StatusId, Task,
    TaskPlacement,
};
use mockable::DefaultClock;
use std::collections::BTreeSet;

/// A plan with one phase and `count` tasks appended to one column.
pub(super) struct Board {
    pub plan: ProjectPlan,
    pub phase: Phase,
    pub status: StatusId,
    pub tasks: Vec<Task>,
}

pub(super) fn board_with_tasks(count: usize) -> Board {
    let mut plan = ProjectPlan::new(ProjectId::new());
    let phase = plan
        .append_phase(NewPhase::new("Build"), &DefaultClock)
        .expect("phase should be created");
    let status = StatusId::new();
    let tasks = (0..count)
        .map(|index| {
            plan.append_task(
                phase.id(),
                status,
                NewTask::new(format!("Task {index}")),
                &DefaultClock,
            )
            .expect("task should be created")
        })
        .collect();
    Board {
        plan,
        phase,
        status,
        tasks,
    }
}

pub(super) fn persisted_task(
    project_id: ProjectId,
    phase_id: PhaseId,
    status_id: StatusId,
    order_key: &str,
    wbs_code: &str,
) -> Task {
    let now = chrono::Utc::now();
    Task::from_persisted(PersistedTaskData {
        id: crate::project::domain::TaskId::new(),
        project_id,
        name: format!("Task {order_key}"),
        description: None,
        assignee: None,
        resources: BTreeSet::new(),
        due_date: None,
        estimated_hours: None,
        actual_hours: None,
        priority_id: None,
        service_id: None,
        task_type: None,
        checklist: Vec::new(),
        tags: BTreeSet::new(),
        placement: TaskPlacement {
            phase_id,
            status_id,
            order_key: OrderKey::parse(order_key).expect("valid order key"),
            wbs_code: WbsCode::parse(wbs_code).expect("valid WBS code"),
        },
        created_at: now,
        updated_at: now,
    })
}
