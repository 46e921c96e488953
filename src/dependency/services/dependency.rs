//! Service layer for adding, removing, and listing dependencies.

use super::ProjectLocks;
use crate::dependency::{
    domain::{Dependency, DependencyError, DependencyGraph, DependencyId, DependencyRecord, NewDependency},
    ports::{DependencyRepository, DependencyRepositoryError},
};
use crate::project::{
    domain::{PlanDomainError, ProjectId, TaskId},
    ports::{PlanRepository, PlanRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for dependency operations.
#[derive(Debug, Error)]
pub enum DependencyServiceError {
    /// The edge was rejected by the graph.
    #[error(transparent)]
    Graph(#[from] DependencyError),
    /// A referenced task does not exist.
    #[error(transparent)]
    Plan(#[from] PlanDomainError),
    /// Task lookup failed.
    #[error(transparent)]
    PlanRepository(#[from] PlanRepositoryError),
    /// Edge persistence failed.
    #[error(transparent)]
    Repository(#[from] DependencyRepositoryError),
}

/// Result type for dependency service operations.
pub type DependencyServiceResult<T> = Result<T, DependencyServiceError>;

/// Dependency orchestration service.
///
/// Edge mutations of one project are serialized through [`ProjectLocks`];
/// clones share the same lock table.
pub struct DependencyService<P, D, C>
where
    P: PlanRepository,
    D: DependencyRepository,
    C: Clock + Send + Sync,
{
    plans: Arc<P>,
    dependencies: Arc<D>,
    clock: Arc<C>,
    locks: Arc<ProjectLocks>,
}

impl<P, D, C> Clone for DependencyService<P, D, C>
where
    P: PlanRepository,
    D: DependencyRepository,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            plans: Arc::clone(&self.plans),
            dependencies: Arc::clone(&self.dependencies),
            clock: Arc::clone(&self.clock),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<P, D, C> DependencyService<P, D, C>
where
    P: PlanRepository,
    D: DependencyRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new dependency service.
    #[must_use]
    pub fn new(plans: Arc<P>, dependencies: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            plans,
            dependencies,
            clock,
            locks: Arc::new(ProjectLocks::new()),
        }
    }

    /// Uses a shared per-project lock table.
    #[must_use]
    pub fn with_locks(mut self, locks: Arc<ProjectLocks>) -> Self {
        self.locks = locks;
        self
    }

    /// Returns the lock table, for sharing with the reorder coordinator.
    #[must_use]
    pub fn locks(&self) -> Arc<ProjectLocks> {
        Arc::clone(&self.locks)
    }

    /// Adds an edge between two tasks of `project_id`.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyServiceError::Graph`] when the edge is rejected
    /// (nothing is persisted) or a repository error when loading or saving
    /// fails.
    pub async fn add_dependency(
        &self,
        project_id: ProjectId,
        spec: NewDependency,
    ) -> DependencyServiceResult<Dependency> {
        let _guard = self.locks.lock(project_id).await;
        let mut graph = self.load_graph(project_id).await?;

        let dependency = match graph.add_edge(spec.clone(), &*self.clock) {
            Ok(dependency) => dependency,
            Err(err) => {
                if let DependencyError::Cycle { path } = &err {
                    tracing::debug!(
                        project_id = %project_id,
                        predecessor = %spec.predecessor(),
                        successor = %spec.successor(),
                        cycle_length = path.len(),
                        "rejected dependency cycle"
                    );
                }
                return Err(err.into());
            }
        };
        self.dependencies.save_dependency(&dependency).await?;
        tracing::debug!(
            project_id = %project_id,
            dependency_id = %dependency.id(),
            kind = %dependency.kind(),
            "added dependency"
        );
        Ok(dependency)
    }

    /// Removes an edge. Removing an unknown edge succeeds without effect.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyServiceError::Repository`] when persistence fails.
    pub async fn remove_dependency(&self, id: DependencyId) -> DependencyServiceResult<()> {
        let Some(dependency) = self.dependencies.find_dependency(id).await? else {
            tracing::debug!(dependency_id = %id, "dependency already absent");
            return Ok(());
        };
        let _guard = self.locks.lock(dependency.project_id()).await;
        let removed = self.dependencies.delete_dependency(id).await?;
        tracing::debug!(
            project_id = %dependency.project_id(),
            dependency_id = %id,
            removed,
            "removed dependency"
        );
        Ok(())
    }

    /// Lists the edges ending at `task_id`, labelled from its side.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::TaskNotFound`] wrapped in
    /// [`DependencyServiceError::Plan`] for an unknown task, or a repository
    /// error when loading fails.
    pub async fn predecessors_of(&self, task_id: TaskId) -> DependencyServiceResult<Vec<DependencyRecord>> {
        let graph = self.load_graph_for_task(task_id).await?;
        Ok(graph
            .predecessors_of(task_id)
            .map(|view| view.to_record())
            .collect())
    }

    /// Lists the edges starting at `task_id`, labelled from its side.
    ///
    /// # Errors
    ///
    /// Same as [`Self::predecessors_of`].
    pub async fn successors_of(&self, task_id: TaskId) -> DependencyServiceResult<Vec<DependencyRecord>> {
        let graph = self.load_graph_for_task(task_id).await?;
        Ok(graph
            .successors_of(task_id)
            .map(|view| view.to_record())
            .collect())
    }

    /// Deletes a task together with every edge touching it.
    ///
    /// Edges are looked up by endpoint, so none survive even if stored under
    /// another project. Returns the removed edges.
    ///
    /// # Errors
    ///
    /// Returns [`PlanDomainError::TaskNotFound`] wrapped in
    /// [`DependencyServiceError::Plan`] for an unknown task, or a repository
    /// error when persistence fails.
    pub async fn delete_task(&self, task_id: TaskId) -> DependencyServiceResult<Vec<Dependency>> {
        let task = self
            .plans
            .find_task(task_id)
            .await?
            .ok_or(PlanDomainError::TaskNotFound(task_id))?;
        let project_id = task.project_id();
        let _guard = self.locks.lock(project_id).await;

        let removed = self.dependencies.dependencies_for_task(task_id).await?;
        for dependency in &removed {
            self.dependencies.delete_dependency(dependency.id()).await?;
        }
        self.plans.delete_task(task_id).await?;
        tracing::debug!(
            project_id = %project_id,
            task_id = %task_id,
            removed_dependencies = removed.len(),
            "deleted task with dependencies"
        );
        Ok(removed)
    }

    async fn load_graph(&self, project_id: ProjectId) -> DependencyServiceResult<DependencyGraph> {
        let plan = self.plans.load_plan(project_id).await?;
        let edges = self.dependencies.dependencies_for_project(project_id).await?;
        Ok(DependencyGraph::from_plan(&plan, edges))
    }

    async fn load_graph_for_task(&self, task_id: TaskId) -> DependencyServiceResult<DependencyGraph> {
        let task = self
            .plans
            .find_task(task_id)
            .await?
            .ok_or(PlanDomainError::TaskNotFound(task_id))?;
        self.load_graph(task.project_id()).await
    }
}
