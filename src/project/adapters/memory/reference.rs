//! In-memory reference data source.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{Priority, ProjectId, ProjectStatus, ServiceRef, UserRef},
    ports::{ReferenceDataError, ReferenceDataResult, ReferenceDataSource},
};

/// Thread-safe in-memory reference data.
///
/// Seed it with the `add_*` methods; statuses created through
/// [`ReferenceDataSource::create_project_status`] are appended to the
/// project's board.
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceData {
    state: Arc<RwLock<ReferenceState>>,
}

#[derive(Debug, Default)]
struct ReferenceState {
    users: Vec<UserRef>,
    statuses: HashMap<ProjectId, Vec<ProjectStatus>>,
    priorities: Vec<Priority>,
    services: Vec<ServiceRef>,
}

fn lock_error(err: impl std::fmt::Display) -> ReferenceDataError {
    ReferenceDataError::persistence(std::io::Error::other(err.to_string()))
}

impl InMemoryReferenceData {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceDataError::Persistence`] when the lock is poisoned.
    pub fn add_user(&self, user: UserRef) -> ReferenceDataResult<()> {
        self.state.write().map_err(lock_error)?.users.push(user);
        Ok(())
    }

    /// Registers a status on its project's board.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceDataError::Persistence`] when the lock is poisoned.
    pub fn add_status(&self, status: ProjectStatus) -> ReferenceDataResult<()> {
        self.state
            .write()
            .map_err(lock_error)?
            .statuses
            .entry(status.project_id)
            .or_default()
            .push(status);
        Ok(())
    }

    /// Registers a priority.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceDataError::Persistence`] when the lock is poisoned.
    pub fn add_priority(&self, priority: Priority) -> ReferenceDataResult<()> {
        self.state.write().map_err(lock_error)?.priorities.push(priority);
        Ok(())
    }

    /// Registers a service.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceDataError::Persistence`] when the lock is poisoned.
    pub fn add_service(&self, service: ServiceRef) -> ReferenceDataResult<()> {
        self.state.write().map_err(lock_error)?.services.push(service);
        Ok(())
    }
}

#[async_trait]
impl ReferenceDataSource for InMemoryReferenceData {
    async fn users(&self) -> ReferenceDataResult<Vec<UserRef>> {
        Ok(self.state.read().map_err(lock_error)?.users.clone())
    }

    async fn project_statuses(
        &self,
        project_id: ProjectId,
    ) -> ReferenceDataResult<Vec<ProjectStatus>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.statuses.get(&project_id).cloned().unwrap_or_default())
    }

    async fn priorities(&self) -> ReferenceDataResult<Vec<Priority>> {
        Ok(self.state.read().map_err(lock_error)?.priorities.clone())
    }

    async fn services(&self) -> ReferenceDataResult<Vec<ServiceRef>> {
        Ok(self.state.read().map_err(lock_error)?.services.clone())
    }

    async fn create_project_status(
        &self,
        project_id: ProjectId,
        name: &str,
    ) -> ReferenceDataResult<ProjectStatus> {
        let status = ProjectStatus::open(project_id, name.trim());
        self.add_status(status.clone())?;
        Ok(status)
    }
}
