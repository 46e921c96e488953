//! Domain model for project plans.
//!
//! A project owns ordered phases; each phase owns tasks arranged in
//! `(phase, status)` columns. Positions are carried by fractional order keys
//! and mirrored by WBS display codes. Move planning is pure and returns a
//! [`ChangeSet`] describing exactly the records that changed.

mod error;
mod ids;
mod phase;
mod plan;
mod reference;
mod reorder;
mod task;

pub use error::PlanDomainError;
pub use ids::{PhaseId, PriorityId, ProjectId, ServiceId, StatusId, TaskId, UserId};
pub use phase::{NewPhase, PersistedPhaseData, Phase};
pub use plan::ProjectPlan;
pub use reference::{Priority, ProjectStatus, ServiceRef, UserRef, names_match, normalize_name};
pub use reorder::{ChangeSet, ChangedField, MoveDestination, Position, TaskChange};
pub use task::{ChecklistItem, NewTask, PersistedTaskData, Task, TaskPlacement};
