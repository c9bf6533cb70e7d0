use serde::Serialize;
use time::macros::format_description;
use time::Date;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartTimerRequest<'a> {
    pub task: &'a str,
}

/// Body of `POST /tasks/{id}/time`. `time` is in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogTimeRequest {
    pub time: i64,
    pub date: String,
}

impl LogTimeRequest {
    pub fn new(minutes: u32, date: Date) -> Result<Self, time::error::Format> {
        Ok(Self {
            time: i64::from(minutes) * 60,
            date: iso_date(date)?,
        })
    }
}

/// `YYYY-MM-DD`.
pub fn iso_date(date: Date) -> Result<String, time::error::Format> {
    date.format(format_description!("[year]-[month]-[day]"))
}
