use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Duration, OffsetDateTime, PrimitiveDateTime};

/// Response of `GET /timers/current`.
#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerResponse {
    pub status: Option<String>,
    pub started_at: Option<String>,
    pub duration: Option<i64>,
    pub task: Option<TimerTask>,
}

#[derive(Default, Debug, Clone, PartialEq, Deserialize)]
pub struct TimerTask {
    pub id: String,
    pub name: Option<String>,
}

/// The single process-wide timer slot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum CurrentTimer {
    #[default]
    Idle,
    #[serde(rename_all = "camelCase")]
    Running {
        task_id: String,
        #[serde(with = "time::serde::rfc3339")]
        started_at: OffsetDateTime,
    },
}

impl CurrentTimer {
    pub fn running(task_id: impl Into<String>, started_at: OffsetDateTime) -> Self {
        Self::Running {
            task_id: task_id.into(),
            started_at,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    pub fn task_id(&self) -> Option<&str> {
        match self {
            Self::Running { task_id, .. } => Some(task_id),
            Self::Idle => None,
        }
    }

    pub fn is_task_running(&self, id: &str) -> bool {
        self.task_id() == Some(id)
    }

    /// Whole seconds since start, never negative.
    pub fn elapsed_seconds(&self, now: OffsetDateTime) -> i64 {
        match self {
            Self::Running { started_at, .. } => (now - *started_at).whole_seconds().max(0),
            Self::Idle => 0,
        }
    }
}

impl TimerResponse {
    /// A timer counts as active when it references a task and is not reported stopped.
    /// `now` backs up a missing or unparseable `startedAt` using `duration`.
    pub fn into_current(self, now: OffsetDateTime) -> CurrentTimer {
        let Some(task) = self.task else {
            return CurrentTimer::Idle;
        };
        if self.status.as_deref() == Some("stopped") {
            return CurrentTimer::Idle;
        }

        let started_at = self
            .started_at
            .as_deref()
            .and_then(parse_started_at)
            .unwrap_or_else(|| now - Duration::seconds(self.duration.unwrap_or(0).max(0)));

        CurrentTimer::Running {
            task_id: task.id,
            started_at,
        }
    }
}

/// Everhour reports `startedAt` as `YYYY-MM-DD HH:MM:SS` in UTC; RFC 3339 is accepted too.
pub fn parse_started_at(value: &str) -> Option<OffsetDateTime> {
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(parsed);
    }
    PrimitiveDateTime::parse(value, format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn parses_everhour_and_rfc3339_timestamps() {
        assert_eq!(
            parse_started_at("2024-02-01 08:30:00"),
            Some(datetime!(2024-02-01 08:30:00 UTC))
        );
        assert_eq!(
            parse_started_at("2024-02-01T08:30:00+01:00"),
            Some(datetime!(2024-02-01 07:30:00 UTC))
        );
        assert_eq!(parse_started_at("yesterday"), None);
    }

    #[test]
    fn response_without_task_is_idle() {
        let response: TimerResponse = serde_json::from_str(r#"{"status":"stopped"}"#).unwrap();
        assert_eq!(
            response.into_current(OffsetDateTime::now_utc()),
            CurrentTimer::Idle
        );
    }

    #[test]
    fn active_response_becomes_running() {
        let response: TimerResponse = serde_json::from_str(
            r#"{"status":"active","startedAt":"2024-02-01 08:30:00","task":{"id":"ev:9","name":"Review"}}"#,
        )
        .unwrap();

        assert_eq!(
            response.into_current(OffsetDateTime::now_utc()),
            CurrentTimer::running("ev:9", datetime!(2024-02-01 08:30:00 UTC))
        );
    }

    #[test]
    fn missing_start_falls_back_to_duration() {
        let now = datetime!(2024-02-01 10:00:00 UTC);
        let response = TimerResponse {
            status: Some("active".to_string()),
            started_at: None,
            duration: Some(600),
            task: Some(TimerTask {
                id: "ev:1".to_string(),
                name: None,
            }),
        };

        assert_eq!(
            response.into_current(now),
            CurrentTimer::running("ev:1", datetime!(2024-02-01 09:50:00 UTC))
        );
    }

    #[test]
    fn elapsed_is_clamped_at_zero() {
        let start = datetime!(2024-02-01 10:00:00 UTC);
        let timer = CurrentTimer::running("ev:1", start);
        assert_eq!(timer.elapsed_seconds(start + Duration::seconds(95)), 95);
        assert_eq!(timer.elapsed_seconds(start - Duration::seconds(5)), 0);
        assert_eq!(CurrentTimer::Idle.elapsed_seconds(start), 0);
    }
}
