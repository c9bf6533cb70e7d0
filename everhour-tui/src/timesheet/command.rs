use super::StatusFilter;

/// Every message the shell can send to the [`Handler`](super::Handler).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Refresh,
    SelectProject { project_id: String },
    StartTimer { task_id: String },
    StopTimer,
    /// Stop if `task_id` is running, otherwise start it.
    ToggleTimer { task_id: String },
    LogTime { task_id: String, minutes: u32 },
    Search { query: String },
    FilterStatus { filter: StatusFilter },
    AddToWeekly { task_id: String },
    /// Takes the remote task id, like the task list rows do.
    RemoveFromWeekly { task_id: String },
    ClearWeekly,
    PinWeekly { id: String },
    UnpinWeekly { id: String },
    LinkWorkspace { project_id: String },
}

impl Command {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Refresh => "refresh",
            Command::SelectProject { .. } => "select_project",
            Command::StartTimer { .. } => "start_timer",
            Command::StopTimer => "stop_timer",
            Command::ToggleTimer { .. } => "toggle_timer",
            Command::LogTime { .. } => "log_time",
            Command::Search { .. } => "search",
            Command::FilterStatus { .. } => "filter_status",
            Command::AddToWeekly { .. } => "add_to_weekly",
            Command::RemoveFromWeekly { .. } => "remove_from_weekly",
            Command::ClearWeekly => "clear_weekly",
            Command::PinWeekly { .. } => "pin_weekly",
            Command::UnpinWeekly { .. } => "unpin_weekly",
            Command::LinkWorkspace { .. } => "link_workspace",
        }
    }
}
