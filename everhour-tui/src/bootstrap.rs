use crate::api::TimeTrackingApi;
use crate::config::EverhourConfig;
use crate::store::{FileStore, SharedStore};
use crate::timesheet::{Handler, HandlerSettings, SystemClock};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Current directory, used as the workspace key for project links.
pub fn current_workspace() -> Option<String> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.display().to_string())
}

pub fn open_state_store() -> Result<SharedStore> {
    let path = EverhourConfig::state_path()?;
    let store = FileStore::open(&path).context("Failed to open local state")?;
    Ok(Arc::new(store))
}

pub fn build_handler(
    cfg: &EverhourConfig,
    api: Box<dyn TimeTrackingApi>,
    store: SharedStore,
) -> Result<Handler> {
    let settings = HandlerSettings {
        auto_add_to_weekly: cfg.auto_add_to_weekly,
        workspace: current_workspace(),
    };
    Handler::new(api, store, Box::new(SystemClock), settings)
}
