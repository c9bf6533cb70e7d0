use everhour::domain::{CurrentTimer, Task};
use everhour::EverhourError;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{
    workspace_key, AddOutcome, Clock, Command, Notice, RecentProjects, StatusFilter, ViewState,
    WeeklyTaskStore, UNKNOWN_TASK,
};
use crate::api::TimeTrackingApi;
use crate::store::{load_typed, save_typed, SharedStore};

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Api(#[from] EverhourError),
    #[error("Timer is already running for {0}")]
    TimerAlreadyRunning(String),
    #[error("Unknown task {0}")]
    UnknownTask(String),
    #[error("Failed to save local state: {0}")]
    Storage(String),
    #[error("Logged time must be at least one minute")]
    InvalidDuration,
    #[error("No workspace to link")]
    NoWorkspace,
}

impl HandlerError {
    fn storage(e: anyhow::Error) -> Self {
        Self::Storage(format!("{e:#}"))
    }
}

#[derive(Debug, Clone)]
pub struct HandlerSettings {
    pub auto_add_to_weekly: bool,
    /// Directory whose linked project is selected on startup.
    pub workspace: Option<String>,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            auto_add_to_weekly: true,
            workspace: None,
        }
    }
}

/// Runs [`Command`]s one at a time against the remote API and local state.
///
/// Errors never escape [`Handler::handle`]; they become error notices that the
/// shell drains with [`Handler::drain_notices`].
pub struct Handler {
    api: Box<dyn TimeTrackingApi>,
    state: ViewState,
    weekly: WeeklyTaskStore,
    recent: RecentProjects,
    store: SharedStore,
    clock: Box<dyn Clock>,
    settings: HandlerSettings,
    notices: Vec<Notice>,
}

impl Handler {
    pub fn new(
        api: Box<dyn TimeTrackingApi>,
        store: SharedStore,
        clock: Box<dyn Clock>,
        settings: HandlerSettings,
    ) -> anyhow::Result<Self> {
        let weekly = WeeklyTaskStore::load(store.clone())?;
        let recent = RecentProjects::load(store.clone())?;

        let mut state = ViewState::new();
        for entry in weekly.list() {
            state.seed_task(entry.original_task.clone());
        }

        Ok(Self {
            api,
            state,
            weekly,
            recent,
            store,
            clock,
            settings,
            notices: Vec::new(),
        })
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn weekly(&self) -> &WeeklyTaskStore {
        &self.weekly
    }

    pub fn recent(&self) -> &RecentProjects {
        &self.recent
    }

    pub fn now(&self) -> time::OffsetDateTime {
        self.clock.now()
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Display name for a remote task id: the catalog, then the weekly plan.
    pub fn task_name(&self, task_id: &str) -> String {
        if let Some(task) = self.state.task(task_id) {
            return task.name.clone();
        }
        self.weekly
            .find_by_remote_id(task_id)
            .map(|entry| entry.name.clone())
            .unwrap_or_else(|| UNKNOWN_TASK.to_string())
    }

    pub fn linked_project_id(&self) -> Option<String> {
        let workspace = self.settings.workspace.as_deref()?;
        match load_typed(self.store.as_ref(), &workspace_key(workspace)) {
            Ok(id) => id,
            Err(e) => {
                warn!(error = %e, "failed to read workspace link");
                None
            }
        }
    }

    /// Fetch projects, pick the linked or first project and pick up a timer
    /// already running on the server.
    pub async fn load_initial(&mut self) {
        if let Err(e) = self.try_load_initial().await {
            self.report("load_initial", e);
        }
    }

    async fn try_load_initial(&mut self) -> Result<(), HandlerError> {
        let projects = self.api.list_projects().await?;
        info!(count = projects.len(), "loaded projects");
        self.state.set_projects(projects);

        let linked = self
            .linked_project_id()
            .filter(|id| self.state.project(id).is_some());
        let initial = linked.or_else(|| self.state.projects().first().map(|p| p.id.clone()));
        if let Some(project_id) = initial {
            self.load_project(&project_id).await?;
        }

        self.reconcile_timer().await;
        Ok(())
    }

    pub async fn handle(&mut self, command: Command) {
        let name = command.name();
        debug!(command = name, "handling command");
        if let Err(e) = self.dispatch(command).await {
            self.report(name, e);
        }
    }

    fn report(&mut self, command: &str, error: HandlerError) {
        warn!(command, error = %error, "command failed");
        self.notices.push(Notice::error(format!("Error: {error}")));
    }

    async fn dispatch(&mut self, command: Command) -> Result<(), HandlerError> {
        match command {
            Command::Refresh => self.refresh().await,
            Command::SelectProject { project_id } => self.select_project(&project_id).await,
            Command::StartTimer { task_id } => self.start_timer(&task_id).await,
            Command::StopTimer => self.stop_timer().await,
            Command::ToggleTimer { task_id } => {
                if self.state.is_task_running(&task_id) {
                    self.stop_timer().await
                } else {
                    self.start_timer(&task_id).await
                }
            }
            Command::LogTime { task_id, minutes } => self.log_time(&task_id, minutes).await,
            Command::Search { query } => {
                self.search(&query);
                Ok(())
            }
            Command::FilterStatus { filter } => {
                self.filter_status(filter);
                Ok(())
            }
            Command::AddToWeekly { task_id } => self.add_to_weekly(&task_id),
            Command::RemoveFromWeekly { task_id } => self.remove_from_weekly(&task_id),
            Command::ClearWeekly => {
                self.weekly.clear().map_err(HandlerError::storage)?;
                self.notices.push(Notice::info("All weekly tasks cleared"));
                Ok(())
            }
            Command::PinWeekly { id } => self.pin_weekly(&id),
            Command::UnpinWeekly { id } => {
                if !self.weekly.unpin(&id).map_err(HandlerError::storage)? {
                    return Err(HandlerError::UnknownTask(id));
                }
                self.notices.push(Notice::info("Task unpinned"));
                Ok(())
            }
            Command::LinkWorkspace { project_id } => self.link_workspace(&project_id),
        }
    }

    /// Reload projects and the selected project's tasks. The timer is only
    /// adopted from the server at startup, so a refresh never touches it.
    async fn refresh(&mut self) -> Result<(), HandlerError> {
        let projects = self.api.list_projects().await?;
        self.state.set_projects(projects);

        let selected = self
            .state
            .selected_project_id()
            .filter(|id| self.state.project(id).is_some())
            .map(str::to_string)
            .or_else(|| self.state.projects().first().map(|p| p.id.clone()));
        match selected {
            Some(project_id) => self.load_project(&project_id).await?,
            None => {
                self.state.set_selected_project(None);
                self.state.clear_tasks();
            }
        }

        self.notices.push(Notice::info("Timesheet refreshed"));
        Ok(())
    }

    async fn select_project(&mut self, project_id: &str) -> Result<(), HandlerError> {
        self.load_project(project_id).await?;
        self.notices.push(Notice::info(format!(
            "Showing tasks for {}",
            self.state.project_name(project_id)
        )));
        self.recent
            .touch(project_id)
            .map_err(HandlerError::storage)?;
        Ok(())
    }

    fn search(&mut self, query: &str) {
        self.state.set_search_term(query);
        let message = if self.state.search_term().is_empty() {
            "Search cleared".to_string()
        } else {
            format!(
                "{} tasks match \"{}\"",
                self.state.filtered_tasks().len(),
                self.state.search_term()
            )
        };
        self.notices.push(Notice::info(message));
    }

    fn filter_status(&mut self, filter: StatusFilter) {
        self.state.set_status_filter(filter);
        self.notices
            .push(Notice::info(format!("Showing {} tasks", filter.label())));
    }

    /// Select `project_id` and replace the task list. A failed fetch leaves
    /// the list empty.
    async fn load_project(&mut self, project_id: &str) -> Result<(), HandlerError> {
        self.state.set_selected_project(Some(project_id.to_string()));
        match self.api.list_tasks(project_id).await {
            Ok(tasks) => {
                debug!(project_id, count = tasks.len(), "loaded tasks");
                self.state.set_tasks(tasks);
                let refreshed = self.weekly.refresh_snapshots(self.state.tasks());
                if let Err(e) = refreshed {
                    self.report("refresh_weekly_snapshots", HandlerError::storage(e));
                }
                Ok(())
            }
            Err(e) => {
                self.state.clear_tasks();
                Err(e.into())
            }
        }
    }

    async fn reconcile_timer(&mut self) {
        let timer = self.api.current_timer().await;
        if let CurrentTimer::Running { task_id, .. } = &timer {
            info!(task_id, "found running timer");
        }
        self.state.set_timer(timer);
    }

    async fn start_timer(&mut self, task_id: &str) -> Result<(), HandlerError> {
        if self.state.is_task_running(task_id) {
            return Err(HandlerError::TimerAlreadyRunning(self.task_name(task_id)));
        }
        if self.state.timer().is_running() {
            self.stop_timer().await?;
        }

        self.api.start_timer(task_id).await?;
        self.state
            .set_timer(CurrentTimer::running(task_id, self.clock.now()));
        info!(task_id, "timer started");
        self.notices.push(Notice::info(format!(
            "Timer started for task {}",
            self.task_name(task_id)
        )));

        if self.settings.auto_add_to_weekly {
            if let Some(task) = self.state.task(task_id).cloned() {
                if let Err(e) = self.weekly.add(&task) {
                    self.report("auto_add_to_weekly", HandlerError::storage(e));
                }
            }
        }
        Ok(())
    }

    async fn stop_timer(&mut self) -> Result<(), HandlerError> {
        let timer = self.state.timer().clone();
        let CurrentTimer::Running { task_id, .. } = &timer else {
            debug!("stop requested without a running timer");
            return Ok(());
        };

        self.api.stop_timer().await?;

        let elapsed = timer.elapsed_seconds(self.clock.now());
        self.state.set_timer(CurrentTimer::Idle);
        info!(task_id, elapsed, "timer stopped");
        self.notices.push(Notice::info(format!(
            "Timer stopped for {}. Elapsed time: {} minutes",
            self.task_name(task_id),
            elapsed / 60
        )));

        if !self.state.add_elapsed(task_id, elapsed) {
            warn!(task_id, "stopped task is not in the catalog");
            self.notices.push(Notice::error(format!(
                "Could not add the elapsed time to {} locally; refresh to update totals",
                self.task_name(task_id)
            )));
        } else if let Err(e) = self.weekly.refresh_snapshots(self.state.task(task_id)) {
            self.report("refresh_weekly_snapshots", HandlerError::storage(e));
        }
        Ok(())
    }

    async fn log_time(&mut self, task_id: &str, minutes: u32) -> Result<(), HandlerError> {
        if minutes == 0 {
            return Err(HandlerError::InvalidDuration);
        }
        self.api.log_time(task_id, minutes).await?;
        info!(task_id, minutes, "time logged");
        self.notices.push(Notice::info("Time logged successfully!"));

        if let Some(project_id) = self.state.selected_project_id().map(str::to_string) {
            self.load_project(&project_id).await?;
        }
        Ok(())
    }

    fn add_to_weekly(&mut self, task_id: &str) -> Result<(), HandlerError> {
        let task: Task = self
            .state
            .task(task_id)
            .cloned()
            .ok_or_else(|| HandlerError::UnknownTask(task_id.to_string()))?;
        let outcome = self.weekly.add(&task).map_err(HandlerError::storage)?;
        if outcome == AddOutcome::Updated {
            debug!(task_id, "weekly entry already present");
        }
        self.notices.push(Notice::info(format!(
            "Task \"{}\" added to weekly plan",
            task.name
        )));
        Ok(())
    }

    fn remove_from_weekly(&mut self, task_id: &str) -> Result<(), HandlerError> {
        match self
            .weekly
            .remove_by_remote_id(task_id)
            .map_err(HandlerError::storage)?
        {
            Some(_) => self.notices.push(Notice::info("Task removed from weekly plan")),
            None => debug!(task_id, "task is not in the weekly plan"),
        }
        Ok(())
    }

    fn pin_weekly(&mut self, id: &str) -> Result<(), HandlerError> {
        if !self.weekly.pin(id).map_err(HandlerError::storage)? {
            return Err(HandlerError::UnknownTask(id.to_string()));
        }
        let name = self
            .weekly
            .get(id)
            .map(|entry| entry.name.clone())
            .unwrap_or_else(|| UNKNOWN_TASK.to_string());
        self.notices.push(Notice::info(format!("Pinned \"{name}\"")));
        Ok(())
    }

    fn link_workspace(&mut self, project_id: &str) -> Result<(), HandlerError> {
        let workspace = self
            .settings
            .workspace
            .clone()
            .ok_or(HandlerError::NoWorkspace)?;
        save_typed(self.store.as_ref(), &workspace_key(&workspace), &project_id)
            .map_err(HandlerError::storage)?;
        info!(workspace, project_id, "linked workspace");
        self.notices.push(Notice::info(format!(
            "Linked {} to project {}",
            workspace,
            self.state.project_name(project_id)
        )));
        Ok(())
    }
}
