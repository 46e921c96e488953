//! In-memory adapters for project plan ports.

mod plan;
mod reference;

pub use plan::InMemoryPlanRepository;
pub use reference::InMemoryReferenceData;
