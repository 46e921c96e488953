//! Port for reference data owned by the surrounding application.

use crate::project::domain::{Priority, ProjectId, ProjectStatus, ServiceRef, UserRef};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for reference data lookups.
pub type ReferenceDataResult<T> = Result<T, ReferenceDataError>;

/// Read access to users, statuses, priorities, and services.
#[async_trait]
pub trait ReferenceDataSource: Send + Sync {
    /// Returns all assignable users.
    async fn users(&self) -> ReferenceDataResult<Vec<UserRef>>;

    /// Returns a project's statuses in board order.
    async fn project_statuses(&self, project_id: ProjectId)
    -> ReferenceDataResult<Vec<ProjectStatus>>;

    /// Returns all priorities.
    async fn priorities(&self) -> ReferenceDataResult<Vec<Priority>>;

    /// Returns all services.
    async fn services(&self) -> ReferenceDataResult<Vec<ServiceRef>>;

    /// Adds an open status to the end of a project's board.
    async fn create_project_status(
        &self,
        project_id: ProjectId,
        name: &str,
    ) -> ReferenceDataResult<ProjectStatus>;
}

/// Errors returned by reference data sources.
#[derive(Debug, Clone, Error)]
pub enum ReferenceDataError {
    /// Backend failure.
    #[error("reference data error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ReferenceDataError {
    /// Wraps a backend error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
