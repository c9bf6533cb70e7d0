use anyhow::Result;

use crate::store::{load_typed, save_typed, SharedStore};

pub const RECENT_PROJECTS_KEY: &str = "recentProjects";
pub const MAX_RECENT_PROJECTS: usize = 3;

/// Most-recently-selected project ids, newest first.
pub struct RecentProjects {
    store: SharedStore,
    ids: Vec<String>,
}

impl RecentProjects {
    pub fn load(store: SharedStore) -> Result<Self> {
        let mut ids: Vec<String> =
            load_typed(store.as_ref(), RECENT_PROJECTS_KEY)?.unwrap_or_default();
        ids.truncate(MAX_RECENT_PROJECTS);
        Ok(Self { store, ids })
    }

    /// Front-insert, dropping any older occurrence and anything past the cap.
    pub fn touch(&mut self, project_id: &str) -> Result<()> {
        self.ids.retain(|id| id != project_id);
        self.ids.insert(0, project_id.to_string());
        self.ids.truncate(MAX_RECENT_PROJECTS);
        save_typed(self.store.as_ref(), RECENT_PROJECTS_KEY, &self.ids)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn contains(&self, project_id: &str) -> bool {
        self.ids.iter().any(|id| id == project_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn keeps_three_most_recent_without_duplicates() {
        let store = MemoryStore::new();
        let mut recent = RecentProjects::load(Arc::new(store.clone())).unwrap();

        for id in ["P1", "P2", "P1", "P3", "P4"] {
            recent.touch(id).unwrap();
        }
        assert_eq!(recent.ids(), ["P4", "P3", "P1"]);

        let reloaded = RecentProjects::load(Arc::new(store)).unwrap();
        assert_eq!(reloaded.ids(), ["P4", "P3", "P1"]);
    }
}
