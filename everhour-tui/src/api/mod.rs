mod dev_backend;

use async_trait::async_trait;
use everhour::domain::{CurrentTimer, Project, Task};
use everhour::{EverhourClient, EverhourError};

pub use dev_backend::DevBackend;

/// The remote calls the handler depends on. Implemented by the real HTTP
/// client and by the in-memory [`DevBackend`].
#[async_trait]
pub trait TimeTrackingApi: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, EverhourError>;

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, EverhourError>;

    async fn start_timer(&self, task_id: &str) -> Result<(), EverhourError>;

    async fn stop_timer(&self) -> Result<(), EverhourError>;

    /// Never fails; anything unexpected reads as no timer.
    async fn current_timer(&self) -> CurrentTimer;

    async fn log_time(&self, task_id: &str, minutes: u32) -> Result<(), EverhourError>;
}

#[async_trait]
impl TimeTrackingApi for EverhourClient {
    async fn list_projects(&self) -> Result<Vec<Project>, EverhourError> {
        EverhourClient::list_projects(self).await
    }

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, EverhourError> {
        EverhourClient::list_tasks(self, project_id).await
    }

    async fn start_timer(&self, task_id: &str) -> Result<(), EverhourError> {
        EverhourClient::start_timer(self, task_id).await
    }

    async fn stop_timer(&self) -> Result<(), EverhourError> {
        EverhourClient::stop_timer(self).await
    }

    async fn current_timer(&self) -> CurrentTimer {
        EverhourClient::current_timer(self).await
    }

    async fn log_time(&self, task_id: &str, minutes: u32) -> Result<(), EverhourError> {
        EverhourClient::log_time(self, task_id, minutes).await
    }
}
