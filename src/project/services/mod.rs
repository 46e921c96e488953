//! Application services for plan editing and task moves.

mod error;
mod planning;
mod reorder;

pub use error::{PlanServiceError, PlanServiceResult};
pub use planning::PlanningService;
pub use reorder::ReorderCoordinator;
