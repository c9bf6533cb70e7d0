use crate::timesheet::{Handler, Notice, WeeklyTask};
use everhour::domain::{Project, Task};
use everhour::time_format::format_elapsed;

mod navigation;
mod state;
pub use state::{InputMode, Pane, TextInput};

pub struct App {
    pub running: bool,
    pub handler: Handler,

    pub focused_pane: Pane,
    pub project_index: usize,
    pub task_index: usize,
    pub weekly_index: usize,

    pub input_mode: InputMode,
    pub search_input: TextInput,
    pub minutes_input: TextInput,

    /// Last notice shown in the status line.
    pub status: Option<Notice>,

    // Loading indicator
    pub is_loading: bool,
    pub throbber_state: throbber_widgets_tui::ThrobberState,
}

impl App {
    pub fn new(handler: Handler) -> Self {
        Self {
            running: true,
            handler,
            focused_pane: Pane::Projects,
            project_index: 0,
            task_index: 0,
            weekly_index: 0,
            input_mode: InputMode::Normal,
            search_input: TextInput::new(),
            minutes_input: TextInput::new(),
            status: None,
            is_loading: false,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn set_status(&mut self, notice: Notice) {
        self.status = Some(notice);
    }

    /// Pull pending notices out of the handler. The last error wins over
    /// later infos so failures are not hidden by follow-up messages.
    pub fn absorb_notices(&mut self) {
        let notices = self.handler.drain_notices();
        let shown = notices
            .iter()
            .rev()
            .find(|n| n.is_error())
            .or_else(|| notices.last())
            .cloned();
        if let Some(notice) = shown {
            self.status = Some(notice);
        }
        self.clamp_selection();
    }

    pub fn projects(&self) -> &[Project] {
        self.handler.state().projects()
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.handler.state().filtered_tasks()
    }

    pub fn weekly_tasks(&self) -> &[WeeklyTask] {
        self.handler.weekly().list()
    }

    pub fn highlighted_project(&self) -> Option<&Project> {
        self.projects().get(self.project_index)
    }

    pub fn highlighted_task(&self) -> Option<&Task> {
        self.visible_tasks().get(self.task_index).copied()
    }

    pub fn highlighted_weekly(&self) -> Option<&WeeklyTask> {
        self.weekly_tasks().get(self.weekly_index)
    }

    /// Remote task id under the cursor in the tasks or weekly pane.
    pub fn highlighted_task_id(&self) -> Option<String> {
        match self.focused_pane {
            Pane::Projects => None,
            Pane::Tasks => self.highlighted_task().map(|t| t.id.clone()),
            Pane::Weekly => self.highlighted_weekly().map(|w| w.everhour_id.clone()),
        }
    }

    /// Live numbers for a weekly entry come from the catalog.
    pub fn weekly_total(&self, entry: &WeeklyTask) -> i64 {
        self.handler
            .state()
            .task(&entry.everhour_id)
            .map(|t| t.time.total)
            .unwrap_or(entry.original_task.time.total)
    }

    /// `HH:MM:SS` of the running timer, if any.
    pub fn running_elapsed(&self) -> Option<String> {
        let timer = self.handler.state().timer();
        timer
            .is_running()
            .then(|| format_elapsed(timer.elapsed_seconds(self.handler.now())))
    }

    pub fn running_task_name(&self) -> Option<String> {
        self.handler
            .state()
            .timer()
            .task_id()
            .map(|id| self.handler.task_name(id))
    }

    pub fn is_searching(&self) -> bool {
        self.input_mode == InputMode::Search
    }

    /// Keep indexes inside their lists after data changes.
    pub fn clamp_selection(&mut self) {
        let projects = self.projects().len();
        let tasks = self.visible_tasks().len();
        let weekly = self.weekly_tasks().len();
        self.project_index = self.project_index.min(projects.saturating_sub(1));
        self.task_index = self.task_index.min(tasks.saturating_sub(1));
        self.weekly_index = self.weekly_index.min(weekly.saturating_sub(1));
    }

    /// Point the project cursor at the selected project.
    pub fn sync_project_cursor(&mut self) {
        let selected = self.handler.state().selected_project_id();
        if let Some(index) = self
            .projects()
            .iter()
            .position(|p| Some(p.id.as_str()) == selected)
        {
            self.project_index = index;
        }
    }
}
