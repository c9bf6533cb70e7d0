use reqwest::{header::ACCEPT, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;

use crate::domain::{
    CurrentTimer, LogTimeRequest, Project, RawTask, StartTimerRequest, Task, TimerResponse,
};
use crate::{ApiToken, EverhourURL, API_KEY_HEADER, DEFAULT_API_URL};

/// Page size used when listing a project's tasks.
pub const TASK_PAGE_SIZE: u32 = 250;

#[derive(Debug, Clone)]
pub struct EverhourClient {
    client: Client,
    base_url: EverhourURL,
    token: Option<ApiToken>,
}

#[derive(Error, Debug)]
pub enum EverhourError {
    #[error("Token not configured")]
    MissingToken,
    #[error("{message}")]
    Remote { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to parse response: {0}")]
    Parsing(String),
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl EverhourClient {
    pub fn new(base_url: &str, token: Option<ApiToken>) -> Result<Self, EverhourError> {
        let client = Client::builder()
            .user_agent(concat!("everhour-tui/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EverhourError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: EverhourURL::parse(base_url)?,
            token,
        })
    }

    pub fn with_default_url(token: Option<ApiToken>) -> Result<Self, EverhourError> {
        Self::new(DEFAULT_API_URL, token)
    }

    pub fn set_token(&mut self, token: Option<ApiToken>) {
        self.token = token;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn token(&self) -> Result<&ApiToken, EverhourError> {
        self.token.as_ref().ok_or(EverhourError::MissingToken)
    }

    fn authorized(
        &self,
        method: reqwest::Method,
        url: EverhourURL,
    ) -> Result<RequestBuilder, EverhourError> {
        let token = self.token()?;
        Ok(self
            .client
            .request(method, url.as_ref())
            .header(API_KEY_HEADER, token.expose())
            .header(ACCEPT, "application/json"))
    }

    /// Send and turn non-2xx responses into [`EverhourError::Remote`].
    /// `fallback` is used when the error body carries no message; `None` means
    /// `HTTP error {status}`.
    async fn send(
        &self,
        request: RequestBuilder,
        call_name: &str,
        fallback: Option<&str>,
    ) -> Result<Response, EverhourError> {
        debug!(call = call_name, "calling Everhour");
        let response = request
            .send()
            .await
            .map_err(|e| EverhourError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = error_message(response, status, fallback).await;
        debug!(call = call_name, status = status.as_u16(), %message, "Everhour returned error");
        Err(EverhourError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        call_name: &str,
        fallback: Option<&str>,
    ) -> Result<T, EverhourError> {
        let response = self.send(request, call_name, fallback).await?;
        response.json::<T>().await.map_err(|e| {
            EverhourError::Parsing(format!("Failed to parse {} response: {}", call_name, e))
        })
    }

    async fn send_without_body(
        &self,
        request: RequestBuilder,
        call_name: &str,
        fallback: Option<&str>,
    ) -> Result<(), EverhourError> {
        let response = self.send(request, call_name, fallback).await?;
        let _ = response.bytes().await;
        Ok(())
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>, EverhourError> {
        let url = self.base_url.append_path("/projects");
        self.get_json(
            self.authorized(reqwest::Method::GET, url)?,
            "GET /projects",
            Some("Failed to fetch projects"),
        )
        .await
    }

    pub async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, EverhourError> {
        let url = self
            .base_url
            .append_path("/projects")
            .append_segment(project_id)
            .append_path("tasks")
            .with_query("limit", &TASK_PAGE_SIZE.to_string())
            .with_query("excludeClosed", "false");

        let raw: Vec<RawTask> = self
            .get_json(
                self.authorized(reqwest::Method::GET, url)?,
                "GET /projects/:id/tasks",
                None,
            )
            .await?;

        Ok(raw.into_iter().map(Task::from).collect())
    }

    pub async fn start_timer(&self, task_id: &str) -> Result<(), EverhourError> {
        let url = self.base_url.append_path("/timers");
        self.send_without_body(
            self.authorized(reqwest::Method::POST, url)?
                .json(&StartTimerRequest { task: task_id }),
            "POST /timers",
            Some("Failed to start timer"),
        )
        .await
    }

    pub async fn stop_timer(&self) -> Result<(), EverhourError> {
        let url = self.base_url.append_path("/timers/current");
        self.send_without_body(
            self.authorized(reqwest::Method::DELETE, url)?,
            "DELETE /timers/current",
            Some("Failed to stop timer"),
        )
        .await
    }

    /// Passive reconciliation: never fails. A missing token, a transport error,
    /// a non-2xx status or an unreadable body all mean "no timer".
    pub async fn current_timer(&self) -> CurrentTimer {
        let url = self.base_url.append_path("/timers/current");
        let Ok(request) = self.authorized(reqwest::Method::GET, url) else {
            return CurrentTimer::Idle;
        };

        match self
            .get_json::<Option<TimerResponse>>(request, "GET /timers/current", None)
            .await
        {
            Ok(Some(response)) => response.into_current(OffsetDateTime::now_utc()),
            Ok(None) => CurrentTimer::Idle,
            Err(e) => {
                debug!(error = %e, "could not read current timer, assuming none");
                CurrentTimer::Idle
            }
        }
    }

    pub async fn log_time(&self, task_id: &str, minutes: u32) -> Result<(), EverhourError> {
        let url = self
            .base_url
            .append_path("/tasks")
            .append_segment(task_id)
            .append_path("time");
        let body = LogTimeRequest::new(minutes, OffsetDateTime::now_utc().date())
            .map_err(|e| EverhourError::Parsing(format!("Failed to format log date: {}", e)))?;

        self.send_without_body(
            self.authorized(reqwest::Method::POST, url)?.json(&body),
            "POST /tasks/:id/time",
            Some("Failed to log time"),
        )
        .await
    }
}

/// A body that fails to parse must not hide the HTTP failure itself.
async fn error_message(response: Response, status: StatusCode, fallback: Option<&str>) -> String {
    let parsed = response.json::<ErrorBody>().await.ok();
    parsed
        .and_then(|body| body.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| match fallback {
            Some(text) => text.to_string(),
            None => format!("HTTP error {}", status.as_u16()),
        })
}
