//! Shell-independent core: view state, weekly plan, recent projects and the
//! command handler that drives them.

mod command;
mod handler;
mod recent;
mod view_state;
mod weekly;

use time::OffsetDateTime;

pub use command::Command;
pub use handler::{Handler, HandlerSettings};
pub use recent::RecentProjects;
pub use view_state::{StatusFilter, ViewState, UNKNOWN_TASK};
pub use weekly::{AddOutcome, WeeklyTask, WeeklyTaskStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-facing outcome of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Key under which a workspace's linked project id is stored.
pub fn workspace_key(workspace: &str) -> String {
    format!("workspaceProject:{workspace}")
}
