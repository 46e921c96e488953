//! In-memory repository for dependency edges.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::dependency::{
    domain::{Dependency, DependencyId},
    ports::{DependencyRepository, DependencyRepositoryError, DependencyRepositoryResult},
};
use crate::project::domain::{ProjectId, TaskId};

/// Thread-safe in-memory dependency repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDependencyRepository {
    state: Arc<RwLock<HashMap<DependencyId, Dependency>>>,
}

impl InMemoryDependencyRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> DependencyRepositoryError {
    DependencyRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl DependencyRepository for InMemoryDependencyRepository {
    async fn save_dependency(&self, dependency: &Dependency) -> DependencyRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.contains_key(&dependency.id()) {
            return Err(DependencyRepositoryError::Duplicate(dependency.id()));
        }
        state.insert(dependency.id(), dependency.clone());
        Ok(())
    }

    async fn delete_dependency(&self, id: DependencyId) -> DependencyRepositoryResult<bool> {
        let mut state = self.state.write().map_err(lock_error)?;
        Ok(state.remove(&id).is_some())
    }

    async fn find_dependency(
        &self,
        id: DependencyId,
    ) -> DependencyRepositoryResult<Option<Dependency>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.get(&id).cloned())
    }

    async fn dependencies_for_project(
        &self,
        project_id: ProjectId,
    ) -> DependencyRepositoryResult<Vec<Dependency>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .values()
            .filter(|dependency| dependency.project_id() == project_id)
            .cloned()
            .collect())
    }

    async fn dependencies_for_task(&self, task_id: TaskId) -> DependencyRepositoryResult<Vec<Dependency>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .values()
            .filter(|dependency| {
                dependency.predecessor() == task_id || dependency.successor() == task_id
            })
            .cloned()
            .collect())
    }
}
