use std::collections::HashMap;

use everhour::domain::{CurrentTimer, Project, Task};

pub const UNKNOWN_TASK: &str = "Unknown task";

/// Task status filter applied before the search term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Closed,
    InProgress,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 5] = [
        StatusFilter::All,
        StatusFilter::Open,
        StatusFilter::Closed,
        StatusFilter::InProgress,
        StatusFilter::Completed,
    ];

    /// Wire value of the status this filter keeps. `None` keeps everything.
    pub fn status(self) -> Option<&'static str> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Open => Some("open"),
            StatusFilter::Closed => Some("closed"),
            StatusFilter::InProgress => Some("in_progress"),
            StatusFilter::Completed => Some("completed"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Open => "open",
            StatusFilter::Closed => "closed",
            StatusFilter::InProgress => "in progress",
            StatusFilter::Completed => "completed",
        }
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    pub fn matches(self, task: &Task) -> bool {
        self.status().map_or(true, |status| task.status == status)
    }
}

/// In-memory projection of what the panel shows.
///
/// Tasks live in one id-indexed catalog. The selected project's list and the
/// weekly plan both refer to catalog entries by id, so local bookkeeping
/// (such as folding a stopped timer into a total) touches exactly one place.
#[derive(Debug, Default)]
pub struct ViewState {
    projects: Vec<Project>,
    catalog: HashMap<String, Task>,
    task_ids: Vec<String>,
    selected_project_id: Option<String>,
    timer: CurrentTimer,
    status_filter: StatusFilter,
    search_term: String,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    // Projects

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn set_projects(&mut self, projects: Vec<Project>) {
        self.projects = projects;
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn project_name(&self, id: &str) -> String {
        self.project(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn selected_project_id(&self) -> Option<&str> {
        self.selected_project_id.as_deref()
    }

    pub fn set_selected_project(&mut self, id: Option<String>) {
        self.selected_project_id = id;
    }

    // Tasks

    /// Replace the selected project's list wholesale. Fresh server data also
    /// overwrites the matching catalog entries.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.task_ids = tasks.iter().map(|t| t.id.clone()).collect();
        for task in tasks {
            self.catalog.insert(task.id.clone(), task);
        }
    }

    pub fn clear_tasks(&mut self) {
        self.task_ids.clear();
    }

    /// Make a task known without displacing fresher data.
    pub fn seed_task(&mut self, task: Task) {
        self.catalog.entry(task.id.clone()).or_insert(task);
    }

    pub fn tasks(&self) -> Vec<&Task> {
        self.task_ids
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .collect()
    }

    /// Tasks of the selected project that pass the status filter and whose
    /// name contains the search term.
    pub fn filtered_tasks(&self) -> Vec<&Task> {
        self.tasks()
            .into_iter()
            .filter(|task| self.status_filter.matches(task))
            .filter(|task| task.matches(&self.search_term))
            .collect()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.catalog.get(id)
    }

    pub fn task_name(&self, id: &str) -> String {
        self.task(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| UNKNOWN_TASK.to_string())
    }

    /// Local approximation of server-side aggregation. Returns false when the
    /// task is not in the catalog.
    pub fn add_elapsed(&mut self, task_id: &str, seconds: i64) -> bool {
        match self.catalog.get_mut(task_id) {
            Some(task) => {
                task.time.total += seconds.max(0);
                true
            }
            None => false,
        }
    }

    // Timer

    pub fn timer(&self) -> &CurrentTimer {
        &self.timer
    }

    pub fn set_timer(&mut self, timer: CurrentTimer) {
        self.timer = timer;
    }

    pub fn is_task_running(&self, task_id: &str) -> bool {
        self.timer.is_task_running(task_id)
    }

    pub fn active_task(&self) -> Option<&Task> {
        self.timer.task_id().and_then(|id| self.task(id))
    }

    // Filters

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.search_term = term.trim().to_lowercase();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, name: &str) -> Task {
        Task {
            id: id.to_string(),
            name: name.to_string(),
            ..Task::default()
        }
    }

    fn names(tasks: Vec<&Task>) -> Vec<&str> {
        tasks.into_iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut state = ViewState::new();
        state.set_tasks(vec![
            task("1", "Alpha"),
            task("2", "beta"),
            task("3", "gamma"),
        ]);

        state.set_search_term("  A ");
        assert_eq!(state.search_term(), "a");
        assert_eq!(names(state.filtered_tasks()), ["Alpha", "beta", "gamma"]);

        state.set_search_term("MM");
        assert_eq!(names(state.filtered_tasks()), ["gamma"]);

        state.set_search_term("z");
        assert!(state.filtered_tasks().is_empty());

        state.set_search_term("");
        assert_eq!(names(state.filtered_tasks()), ["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn status_filter_applies_before_search() {
        let with_status = |id: &str, name: &str, status: &str| Task {
            status: status.to_string(),
            ..task(id, name)
        };
        let mut state = ViewState::new();
        state.set_tasks(vec![
            with_status("1", "Write docs", "open"),
            with_status("2", "Review docs", "in_progress"),
            with_status("3", "Ship release", "open"),
            with_status("4", "Old docs", "closed"),
        ]);

        state.set_status_filter(StatusFilter::Open);
        assert_eq!(names(state.filtered_tasks()), ["Write docs", "Ship release"]);

        state.set_search_term("docs");
        assert_eq!(names(state.filtered_tasks()), ["Write docs"]);

        state.set_status_filter(StatusFilter::InProgress);
        assert_eq!(names(state.filtered_tasks()), ["Review docs"]);

        state.set_status_filter(StatusFilter::Completed);
        assert!(state.filtered_tasks().is_empty());

        state.set_status_filter(StatusFilter::All);
        assert_eq!(
            names(state.filtered_tasks()),
            ["Write docs", "Review docs", "Old docs"]
        );
    }

    #[test]
    fn status_filter_cycles_through_every_value() {
        let mut filter = StatusFilter::default();
        let mut seen = Vec::new();
        for _ in 0..StatusFilter::ALL.len() {
            seen.push(filter.label());
            filter = filter.next();
        }

        assert_eq!(filter, StatusFilter::All);
        assert_eq!(seen, ["all", "open", "closed", "in progress", "completed"]);
    }

    #[test]
    fn set_tasks_replaces_list_but_keeps_catalog() {
        let mut state = ViewState::new();
        state.set_tasks(vec![task("1", "Alpha")]);
        state.set_tasks(vec![task("2", "Beta")]);

        assert_eq!(names(state.tasks()), ["Beta"]);
        assert_eq!(state.task_name("1"), "Alpha");
        assert_eq!(state.task_name("404"), UNKNOWN_TASK);
    }

    #[test]
    fn seed_does_not_override_fresh_data() {
        let mut state = ViewState::new();
        let mut fresh = task("1", "Fresh");
        fresh.time.total = 100;
        state.set_tasks(vec![fresh]);
        state.seed_task(task("1", "Stale"));
        state.seed_task(task("2", "Only snapshot"));

        assert_eq!(state.task("1").unwrap().time.total, 100);
        assert_eq!(state.task_name("2"), "Only snapshot");
    }

    #[test]
    fn elapsed_folds_into_catalog_entry() {
        let mut state = ViewState::new();
        state.set_tasks(vec![task("1", "Alpha")]);

        assert!(state.add_elapsed("1", 90));
        assert!(!state.add_elapsed("missing", 90));
        assert_eq!(state.tasks()[0].time.total, 90);
    }
}
