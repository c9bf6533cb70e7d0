use anyhow::Result;
use everhour::domain::Task;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::store::{load_typed, save_typed, SharedStore};

pub const WEEKLY_TASKS_KEY: &str = "weeklyTasks";

/// An entry in the user's weekly plan, pointing at a remote task.
///
/// `original_task` is the latest known copy of the task. It seeds the task
/// catalog after a restart; live numbers always come from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTask {
    pub id: String,
    pub everhour_id: String,
    pub name: String,
    pub created_at: i64,
    pub original_task: Task,
    #[serde(default)]
    pub pinned: bool,
}

/// Whether [`WeeklyTaskStore::add`] created an entry or refreshed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Updated,
}

pub struct WeeklyTaskStore {
    store: SharedStore,
    tasks: Vec<WeeklyTask>,
}

impl WeeklyTaskStore {
    pub fn load(store: SharedStore) -> Result<Self> {
        let tasks: Vec<WeeklyTask> =
            load_typed(store.as_ref(), WEEKLY_TASKS_KEY)?.unwrap_or_default();
        let mut this = Self { store, tasks };
        // A hand-edited file could carry several pins; keep the first one.
        if this.tasks.iter().filter(|t| t.pinned).count() > 1 {
            let mut seen = false;
            for task in &mut this.tasks {
                if task.pinned {
                    task.pinned = !seen;
                    seen = true;
                }
            }
            this.save()?;
        }
        Ok(this)
    }

    fn save(&self) -> Result<()> {
        save_typed(self.store.as_ref(), WEEKLY_TASKS_KEY, &self.tasks)
    }

    /// Idempotent per remote id: an existing entry only gets its name refreshed.
    pub fn add(&mut self, task: &Task) -> Result<AddOutcome> {
        let outcome = match self.tasks.iter_mut().find(|t| t.everhour_id == task.id) {
            Some(existing) => {
                existing.name = task.name.clone();
                AddOutcome::Updated
            }
            None => {
                self.tasks.push(WeeklyTask {
                    id: Uuid::new_v4().to_string(),
                    everhour_id: task.id.clone(),
                    name: task.name.clone(),
                    created_at: now_millis(),
                    original_task: task.clone(),
                    pinned: false,
                });
                AddOutcome::Added
            }
        };
        debug!(everhour_id = %task.id, ?outcome, "weekly plan add");
        self.save()?;
        Ok(outcome)
    }

    /// Overwrite the snapshot and name of entries whose remote task appears in
    /// `tasks`. Persists only when something changed. Returns the number of
    /// refreshed entries.
    pub fn refresh_snapshots<'a>(
        &mut self,
        tasks: impl IntoIterator<Item = &'a Task>,
    ) -> Result<usize> {
        let mut refreshed = 0;
        for task in tasks {
            if let Some(entry) = self.tasks.iter_mut().find(|t| t.everhour_id == task.id) {
                if entry.original_task != *task {
                    entry.original_task = task.clone();
                    entry.name = task.name.clone();
                    refreshed += 1;
                }
            }
        }
        if refreshed > 0 {
            debug!(refreshed, "weekly snapshots refreshed");
            self.save()?;
        }
        Ok(refreshed)
    }

    /// Remove by local id. Returns the removed entry, if any.
    pub fn remove(&mut self, id: &str) -> Result<Option<WeeklyTask>> {
        let Some(index) = self.tasks.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        let removed = self.tasks.remove(index);
        self.save()?;
        Ok(Some(removed))
    }

    pub fn remove_by_remote_id(&mut self, everhour_id: &str) -> Result<Option<WeeklyTask>> {
        match self.find_by_remote_id(everhour_id).map(|t| t.id.clone()) {
            Some(id) => self.remove(&id),
            None => Ok(None),
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.tasks.clear();
        self.save()
    }

    /// Moves the single pin to `id`. Unknown ids leave every entry unpinned.
    pub fn pin(&mut self, id: &str) -> Result<bool> {
        let mut found = false;
        for task in &mut self.tasks {
            task.pinned = task.id == id;
            found |= task.pinned;
        }
        self.save()?;
        Ok(found)
    }

    pub fn unpin(&mut self, id: &str) -> Result<bool> {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(false);
        };
        task.pinned = false;
        self.save()?;
        Ok(true)
    }

    pub fn list(&self) -> &[WeeklyTask] {
        &self.tasks
    }

    pub fn list_pinned(&self) -> Vec<&WeeklyTask> {
        self.tasks.iter().filter(|t| t.pinned).collect()
    }

    pub fn pinned(&self) -> Option<&WeeklyTask> {
        self.list_pinned().into_iter().next()
    }

    pub fn get(&self, id: &str) -> Option<&WeeklyTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_by_remote_id(&self, everhour_id: &str) -> Option<&WeeklyTask> {
        self.tasks.iter().find(|t| t.everhour_id == everhour_id)
    }

    pub fn contains_remote_id(&self, everhour_id: &str) -> bool {
        self.find_by_remote_id(everhour_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn task(id: &str, name: &str) -> Task {
        Task {
            id: id.to_string(),
            name: name.to_string(),
            status: "open".to_string(),
            ..Task::default()
        }
    }

    fn store() -> (MemoryStore, WeeklyTaskStore) {
        let memory = MemoryStore::new();
        let weekly = WeeklyTaskStore::load(Arc::new(memory.clone())).unwrap();
        (memory, weekly)
    }

    #[test]
    fn adding_same_remote_task_twice_keeps_one_entry() {
        let (_, mut weekly) = store();

        assert_eq!(weekly.add(&task("ev:1", "Draft")).unwrap(), AddOutcome::Added);
        assert_eq!(weekly.add(&task("ev:1", "Final")).unwrap(), AddOutcome::Updated);

        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly.list()[0].name, "Final");
        assert!(!weekly.list()[0].pinned);
    }

    #[test]
    fn snapshots_follow_fresh_task_data() {
        let (memory, mut weekly) = store();
        weekly.add(&task("ev:1", "One")).unwrap();
        let mut fresh = task("ev:1", "One, renamed");
        fresh.time.total = 3600;

        assert_eq!(
            weekly
                .refresh_snapshots([&fresh, &task("ev:9", "Not planned")])
                .unwrap(),
            1
        );
        assert_eq!(weekly.refresh_snapshots([&fresh]).unwrap(), 0);

        let reloaded = WeeklyTaskStore::load(Arc::new(memory)).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.list()[0].name, "One, renamed");
        assert_eq!(reloaded.list()[0].original_task.time.total, 3600);
    }

    #[test]
    fn clear_empties_the_list() {
        let (_, mut weekly) = store();
        weekly.add(&task("ev:1", "One")).unwrap();
        weekly.add(&task("ev:2", "Two")).unwrap();

        weekly.clear().unwrap();
        assert!(weekly.list().is_empty());
    }

    #[test]
    fn remove_is_noop_for_unknown_id() {
        let (_, mut weekly) = store();
        weekly.add(&task("ev:1", "One")).unwrap();

        assert_eq!(weekly.remove("missing").unwrap(), None);
        assert_eq!(weekly.len(), 1);

        let removed = weekly.remove_by_remote_id("ev:1").unwrap().unwrap();
        assert_eq!(removed.everhour_id, "ev:1");
        assert!(weekly.is_empty());
    }

    #[test]
    fn at_most_one_task_is_pinned() {
        let (_, mut weekly) = store();
        for i in 0..4 {
            weekly.add(&task(&format!("ev:{i}"), "Task")).unwrap();
        }
        let ids: Vec<String> = weekly.list().iter().map(|t| t.id.clone()).collect();

        let steps: [(&str, usize); 7] = [
            ("pin", 0),
            ("pin", 2),
            ("unpin", 0),
            ("pin", 3),
            ("unpin", 3),
            ("pin", 1),
            ("pin", 1),
        ];
        for (op, index) in steps {
            match op {
                "pin" => weekly.pin(&ids[index]).unwrap(),
                _ => weekly.unpin(&ids[index]).unwrap(),
            };
            assert!(weekly.list_pinned().len() <= 1, "after {op} {index}");
        }
        assert_eq!(weekly.pinned().map(|t| t.id.as_str()), Some(ids[1].as_str()));
    }

    #[test]
    fn pinning_b_unpins_a() {
        let (_, mut weekly) = store();
        weekly.add(&task("ev:a", "A")).unwrap();
        weekly.add(&task("ev:b", "B")).unwrap();
        let a = weekly.find_by_remote_id("ev:a").unwrap().id.clone();
        let b = weekly.find_by_remote_id("ev:b").unwrap().id.clone();

        weekly.pin(&a).unwrap();
        weekly.pin(&b).unwrap();

        assert!(!weekly.get(&a).unwrap().pinned);
        assert!(weekly.get(&b).unwrap().pinned);
    }

    #[test]
    fn every_mutation_is_persisted() {
        let (memory, mut weekly) = store();
        weekly.add(&task("ev:1", "One")).unwrap();
        let id = weekly.list()[0].id.clone();
        weekly.pin(&id).unwrap();

        let reloaded = WeeklyTaskStore::load(Arc::new(memory.clone())).unwrap();
        assert_eq!(reloaded.list(), weekly.list());
        assert!(memory.get(WEEKLY_TASKS_KEY).unwrap().is_some());
    }

    #[test]
    fn load_repairs_multiple_pins() {
        let memory = MemoryStore::new();
        let first = WeeklyTask {
            id: "w1".to_string(),
            everhour_id: "ev:1".to_string(),
            name: "One".to_string(),
            created_at: 0,
            original_task: task("ev:1", "One"),
            pinned: true,
        };
        let mut second = first.clone();
        second.id = "w2".to_string();
        second.everhour_id = "ev:2".to_string();
        save_typed(&memory, WEEKLY_TASKS_KEY, &vec![first.clone(), second]).unwrap();

        let weekly = WeeklyTaskStore::load(Arc::new(memory)).unwrap();
        assert_eq!(weekly.list_pinned(), vec![&first]);
    }
}
