//! Application services driving an import from upload to commit.

mod error;
mod reconciler;

pub use error::{ImportServiceError, ImportServiceResult};
pub use reconciler::ImportReconciler;
