//! Repository port for dependency edges.

use crate::dependency::domain::{Dependency, DependencyId};
use crate::project::domain::{ProjectId, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for dependency repository operations.
pub type DependencyRepositoryResult<T> = Result<T, DependencyRepositoryError>;

/// Dependency persistence contract.
#[async_trait]
pub trait DependencyRepository: Send + Sync {
    /// Stores a new edge.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyRepositoryError::Duplicate`] when the identifier
    /// already exists.
    async fn save_dependency(&self, dependency: &Dependency) -> DependencyRepositoryResult<()>;

    /// Deletes an edge. Returns `false` when it did not exist.
    async fn delete_dependency(&self, id: DependencyId) -> DependencyRepositoryResult<bool>;

    /// Finds an edge by identifier.
    async fn find_dependency(&self, id: DependencyId)
    -> DependencyRepositoryResult<Option<Dependency>>;

    /// Returns every edge of a project.
    async fn dependencies_for_project(
        &self,
        project_id: ProjectId,
    ) -> DependencyRepositoryResult<Vec<Dependency>>;

    /// Returns every edge with `task_id` as either endpoint, whatever
    /// project it is stored under.
    async fn dependencies_for_task(&self, task_id: TaskId) -> DependencyRepositoryResult<Vec<Dependency>>;
}

/// Errors returned by dependency repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DependencyRepositoryError {
    /// An edge with the same identifier already exists.
    #[error("duplicate dependency identifier: {0}")]
    Duplicate(DependencyId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DependencyRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
