use async_trait::async_trait;
use everhour::domain::{CurrentTimer, Project, Task, TaskTime};
use everhour::EverhourError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use time::OffsetDateTime;

use super::TimeTrackingApi;

/// In-memory stand-in for the Everhour API, used by `dev` mode and tests.
/// Clones share the same data.
#[derive(Debug, Clone)]
pub struct DevBackend {
    store: Arc<Mutex<DevStore>>,
}

#[derive(Debug, Default)]
struct DevStore {
    projects: Vec<Project>,
    tasks: HashMap<String, Vec<Task>>,
    timer: CurrentTimer,
    failure: Option<String>,
    calls: Vec<String>,
    logged: Vec<(String, u32)>,
}

impl DevStore {
    fn task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks
            .values_mut()
            .flat_map(|tasks| tasks.iter_mut())
            .find(|task| task.id == task_id)
    }

    fn record(&mut self, call: String) -> Result<(), EverhourError> {
        self.calls.push(call);
        match &self.failure {
            Some(message) => Err(EverhourError::Remote {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for DevBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DevBackend {
    /// Backend seeded with a few projects and tasks.
    pub fn new() -> Self {
        let backend = Self::empty();
        {
            let mut store = backend.lock();
            let (projects, tasks) = seed_dev_data();
            store.projects = projects;
            store.tasks = tasks;
        }
        backend
    }

    pub fn empty() -> Self {
        Self {
            store: Arc::new(Mutex::new(DevStore::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DevStore> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_project(self, project: Project, tasks: Vec<Task>) -> Self {
        {
            let mut store = self.lock();
            store.tasks.insert(project.id.clone(), tasks);
            store.projects.push(project);
        }
        self
    }

    pub fn with_running_timer(self, task_id: &str, started_at: OffsetDateTime) -> Self {
        self.lock().timer = CurrentTimer::running(task_id, started_at);
        self
    }

    /// Make every call except `current_timer` fail with `message`.
    pub fn fail_with(&self, message: &str) {
        self.lock().failure = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    pub fn logged(&self) -> Vec<(String, u32)> {
        self.lock().logged.clone()
    }

    pub fn server_timer(&self) -> CurrentTimer {
        self.lock().timer.clone()
    }
}

#[async_trait]
impl TimeTrackingApi for DevBackend {
    async fn list_projects(&self) -> Result<Vec<Project>, EverhourError> {
        let mut store = self.lock();
        store.record("list_projects".to_string())?;
        Ok(store.projects.clone())
    }

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, EverhourError> {
        let mut store = self.lock();
        store.record(format!("list_tasks {project_id}"))?;
        match store.tasks.get(project_id) {
            Some(tasks) => Ok(tasks.clone()),
            None => Err(EverhourError::Remote {
                status: 404,
                message: "Project not found".to_string(),
            }),
        }
    }

    async fn start_timer(&self, task_id: &str) -> Result<(), EverhourError> {
        let mut store = self.lock();
        store.record(format!("start_timer {task_id}"))?;
        if store.task_mut(task_id).is_none() {
            return Err(EverhourError::Remote {
                status: 404,
                message: "Task not found".to_string(),
            });
        }
        store.timer = CurrentTimer::running(task_id, OffsetDateTime::now_utc());
        Ok(())
    }

    async fn stop_timer(&self) -> Result<(), EverhourError> {
        let mut store = self.lock();
        store.record("stop_timer".to_string())?;
        let timer = std::mem::take(&mut store.timer);
        let CurrentTimer::Running { task_id, .. } = &timer else {
            return Err(EverhourError::Remote {
                status: 404,
                message: "No active timer".to_string(),
            });
        };
        let elapsed = timer.elapsed_seconds(OffsetDateTime::now_utc());
        if let Some(task) = store.task_mut(task_id) {
            task.time.total += elapsed;
            task.time.today += elapsed;
        }
        Ok(())
    }

    async fn current_timer(&self) -> CurrentTimer {
        let mut store = self.lock();
        store.calls.push("current_timer".to_string());
        store.timer.clone()
    }

    async fn log_time(&self, task_id: &str, minutes: u32) -> Result<(), EverhourError> {
        let mut store = self.lock();
        store.record(format!("log_time {task_id} {minutes}"))?;
        let seconds = i64::from(minutes) * 60;
        match store.task_mut(task_id) {
            Some(task) => {
                task.time.total += seconds;
                task.time.today += seconds;
            }
            None => {
                return Err(EverhourError::Remote {
                    status: 404,
                    message: "Task not found".to_string(),
                })
            }
        }
        store.logged.push((task_id.to_string(), minutes));
        Ok(())
    }
}

fn dev_task(id: &str, name: &str, project_id: &str, total: i64, today: i64) -> Task {
    Task {
        id: id.to_string(),
        name: name.to_string(),
        status: "open".to_string(),
        project_ids: vec![project_id.to_string()],
        time: TaskTime { total, today },
        due_at: None,
        labels: Vec::new(),
    }
}

fn seed_dev_data() -> (Vec<Project>, HashMap<String, Vec<Task>>) {
    let projects = vec![
        Project {
            id: "ev:100".to_string(),
            name: "Website Redesign".to_string(),
            status: "open".to_string(),
        },
        Project {
            id: "ev:200".to_string(),
            name: "Mobile App".to_string(),
            status: "open".to_string(),
        },
        Project {
            id: "ev:300".to_string(),
            name: "Internal Tools".to_string(),
            status: "archived".to_string(),
        },
    ];

    let mut tasks = HashMap::new();
    tasks.insert(
        "ev:100".to_string(),
        vec![
            dev_task("ev:101", "Landing page layout", "ev:100", 5 * 3600 + 20 * 60, 1800),
            dev_task("ev:102", "Accessibility audit", "ev:100", 2 * 3600, 0),
            Task {
                status: "closed".to_string(),
                labels: vec!["design".to_string()],
                due_at: Some("2024-06-28".to_string()),
                ..dev_task("ev:103", "Pick brand colors", "ev:100", 45 * 60, 0)
            },
        ],
    );
    tasks.insert(
        "ev:200".to_string(),
        vec![
            dev_task("ev:201", "Push notifications", "ev:200", 9 * 3600, 3600),
            dev_task("ev:202", "Offline sync spike", "ev:200", 3 * 3600 + 15 * 60, 0),
        ],
    );
    tasks.insert(
        "ev:300".to_string(),
        vec![dev_task("ev:301", "Release checklist", "ev:300", 1800, 0)],
    );

    (projects, tasks)
}
