use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::time_format::sum_per_user_seconds;

pub const UNNAMED_TASK: &str = "Unnamed task";
pub const DEFAULT_TASK_STATUS: &str = "open";

/// A task exactly as `/projects/{id}/tasks` returns it. Almost every field is optional.
#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTask {
    pub id: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub projects: Option<Vec<String>>,
    pub labels: Option<Vec<String>>,
    pub due_at: Option<String>,
    pub time: Option<RawTaskTime>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct RawTaskTime {
    pub total: Option<i64>,
    pub users: Option<HashMap<String, i64>>,
}

/// Normalized task. `time.today` is aggregated locally from the per-user mapping.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub project_ids: Vec<String>,
    #[serde(default)]
    pub time: TaskTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_at: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTime {
    pub total: i64,
    pub today: i64,
}

impl From<RawTask> for Task {
    fn from(raw: RawTask) -> Self {
        let (total, users) = match raw.time {
            Some(time) => (time.total.unwrap_or(0), time.users),
            None => (0, None),
        };

        Self {
            id: raw.id,
            name: raw
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNNAMED_TASK.to_string()),
            status: raw
                .status
                .filter(|status| !status.is_empty())
                .unwrap_or_else(|| DEFAULT_TASK_STATUS.to_string()),
            project_ids: raw.projects.unwrap_or_default(),
            time: TaskTime {
                total,
                today: sum_per_user_seconds(users.as_ref()),
            },
            due_at: raw.due_at,
            labels: raw.labels.unwrap_or_default(),
        }
    }
}

impl Task {
    /// Case-insensitive substring match; `needle` must already be lower-cased.
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.name.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_missing_fields() {
        let raw: RawTask = serde_json::from_str(r#"{"id":"ev:1","projects":null}"#).unwrap();
        let task = Task::from(raw);

        assert_eq!(task.name, UNNAMED_TASK);
        assert_eq!(task.status, "open");
        assert!(task.project_ids.is_empty());
        assert!(task.labels.is_empty());
        assert_eq!(task.time, TaskTime::default());
    }

    #[test]
    fn sums_user_time_into_today() {
        let raw: RawTask = serde_json::from_str(
            r#"{
                "id": "ev:2",
                "name": "Write docs",
                "status": "closed",
                "projects": ["ev:10"],
                "labels": ["docs"],
                "dueAt": "2024-05-01",
                "time": {"total": 7200, "users": {"1": 60, "2": 90}}
            }"#,
        )
        .unwrap();
        let task = Task::from(raw);

        assert_eq!(task.name, "Write docs");
        assert_eq!(task.status, "closed");
        assert_eq!(task.project_ids, vec!["ev:10".to_string()]);
        assert_eq!(task.time.total, 7200);
        assert_eq!(task.time.today, 150);
        assert_eq!(task.due_at.as_deref(), Some("2024-05-01"));
    }
}
