use crate::domain::{Task, TaskId};
use crate::error::{TaskError, TaskResult};
use crate::persistence::BlobStore;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, info, warn};

/// Fixed key the task list is stored under
pub const TASKS_KEY: &str = "tasks";

/// Owns the task list and mirrors it into the blob store after every change.
///
/// Lifecycle: construct, `load`, then operate. Mutations are staged on a copy
/// of the list, written, and only then committed to memory, so a failed write
/// leaves both sides as they were.
pub struct TaskStore {
    backend: Box<dyn BlobStore>,
    tasks: Vec<Task>,
    /// Highest id handed out or loaded, so ids keep increasing
    last_id: i64,
}

impl TaskStore {
    /// Create an empty store (nothing loaded yet)
    pub fn new(backend: Box<dyn BlobStore>) -> Self {
        Self {
            backend,
            tasks: Vec::new(),
            last_id: 0,
        }
    }

    /// Create a store and load the persisted list
    pub fn open(backend: Box<dyn BlobStore>) -> Result<Self> {
        let mut store = Self::new(backend);
        store.load()?;
        Ok(store)
    }

    /// All tasks, newest first
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// A missing or corrupt blob yields an empty list. Only a failure to read
    /// the backend itself is an error.
    pub fn load(&mut self) -> Result<()> {
        let raw = self
            .backend
            .get(TASKS_KEY)
            .context("Failed to read stored tasks")?;

        self.tasks = match raw {
            Some(raw) => decode_tasks(&raw),
            None => Vec::new(),
        };
        self.last_id = self.tasks.iter().map(|t| t.id.0).max().unwrap_or(0);

        debug!(count = self.tasks.len(), "loaded tasks");
        Ok(())
    }

    /// Write the full list, overwriting whatever was stored
    pub fn persist(&mut self) -> Result<()> {
        write_tasks(self.backend.as_mut(), &self.tasks)
    }

    /// Write a staged list and make it the current one
    fn commit(&mut self, tasks: Vec<Task>) -> Result<()> {
        write_tasks(self.backend.as_mut(), &tasks)?;
        self.tasks = tasks;
        Ok(())
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Add a task at the front of the list
    pub fn add(&mut self, text: &str, deadline: Option<NaiveDateTime>) -> TaskResult<Task> {
        self.add_at(text, deadline, Utc::now())
    }

    /// Add a task using an explicit creation time
    pub fn add_at(
        &mut self,
        text: &str,
        deadline: Option<NaiveDateTime>,
        now: DateTime<Utc>,
    ) -> TaskResult<Task> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }

        let id = self.next_id(now.timestamp_millis())?;
        let task = Task::new(id, text.to_string(), deadline, now);

        let mut tasks = Vec::with_capacity(self.tasks.len() + 1);
        tasks.push(task.clone());
        tasks.extend(self.tasks.iter().cloned());
        self.commit(tasks)?;
        self.last_id = id.0;

        info!(id = %task.id, has_deadline = task.time.is_some(), "task added");
        Ok(task)
    }

    /// Flip completion. Returns the new state, None if no such task
    pub fn toggle_complete(&mut self, id: TaskId) -> TaskResult<Option<bool>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let mut tasks = self.tasks.clone();
        let task = &mut tasks[index];
        task.completed = !task.completed;
        let completed = task.completed;
        self.commit(tasks)?;

        info!(id = %id, completed, "task toggled");
        Ok(Some(completed))
    }

    /// Update text and/or deadline.
    ///
    /// Blank text and a missing deadline leave the respective field as is.
    /// Returns the updated task, None if no such task.
    pub fn edit(
        &mut self,
        id: TaskId,
        new_text: Option<&str>,
        new_deadline: Option<NaiveDateTime>,
    ) -> TaskResult<Option<Task>> {
        let Some(index) = self.position(id) else {
            return Ok(None);
        };

        let mut tasks = self.tasks.clone();
        let task = &mut tasks[index];
        if let Some(text) = new_text.map(str::trim).filter(|t| !t.is_empty()) {
            task.text = text.to_string();
        }
        if let Some(deadline) = new_deadline {
            task.set_deadline(deadline);
        }

        let updated = task.clone();
        self.commit(tasks)?;

        info!(id = %id, "task edited");
        Ok(Some(updated))
    }

    /// Remove a task. Returns whether anything was removed
    pub fn delete(&mut self, id: TaskId) -> TaskResult<bool> {
        if self.position(id).is_none() {
            return Ok(false);
        }

        let tasks = self.tasks.iter().filter(|t| t.id != id).cloned().collect();
        self.commit(tasks)?;

        info!(id = %id, "task deleted");
        Ok(true)
    }

    /// Creation-time id, bumped past the last one when the clock stalls.
    /// Does not reserve the id; `add_at` records it once the write succeeds.
    fn next_id(&self, now_ms: i64) -> TaskResult<TaskId> {
        let after_last = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| anyhow!("No task ids left after {}", self.last_id))?;
        Ok(TaskId(now_ms.max(after_last)))
    }
}

fn write_tasks(backend: &mut dyn BlobStore, tasks: &[Task]) -> Result<()> {
    let json = serde_json::to_string(tasks).context("Failed to serialize tasks")?;
    backend
        .set(TASKS_KEY, &json)
        .context("Failed to write stored tasks")?;
    Ok(())
}

/// Decode the stored array, skipping records that are not tasks
fn decode_tasks(raw: &str) -> Vec<Task> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(e) => {
            warn!(error = %e, "stored task list is not a JSON array, starting empty");
            return Vec::new();
        }
    };

    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Task>(value) {
            Ok(task) => Some(task),
            Err(e) => {
                warn!(index, error = %e, "skipping unreadable task record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{filter_tasks, Filter};
    use crate::persistence::{FileBlobStore, MemoryBlobStore};
    use chrono::{Duration, Local, TimeZone};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Memory backend whose writes can be switched off from the test
    struct FlakyBlobStore {
        inner: MemoryBlobStore,
        fail_writes: Rc<Cell<bool>>,
    }

    impl BlobStore for FlakyBlobStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes.get() {
                anyhow::bail!("disk full");
            }
            self.inner.set(key, value)
        }
    }

    fn create_flaky_store() -> (TaskStore, Rc<Cell<bool>>) {
        let fail_writes = Rc::new(Cell::new(false));
        let backend = FlakyBlobStore {
            inner: MemoryBlobStore::new(),
            fail_writes: Rc::clone(&fail_writes),
        };
        (TaskStore::new(Box::new(backend)), fail_writes)
    }

    fn create_test_store() -> TaskStore {
        TaskStore::new(Box::new(MemoryBlobStore::new()))
    }

    fn stored_json(store: &TaskStore) -> Option<String> {
        store.backend.get(TASKS_KEY).unwrap()
    }

    #[test]
    fn test_add_prepends_and_persists() {
        let mut store = create_test_store();

        let first = store.add("First", None).unwrap();
        let second = store.add("Second", None).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.tasks()[0].id, second.id);
        assert_eq!(store.tasks()[1].id, first.id);
        assert!(stored_json(&store).unwrap().contains("Second"));
    }

    #[test]
    fn test_add_trims_text() {
        let mut store = create_test_store();
        let task = store.add("  Buy milk  ", None).unwrap();
        assert_eq!(task.text, "Buy milk");
    }

    #[test]
    fn test_add_rejects_blank_text() {
        let mut store = create_test_store();
        store.add("Keep me", None).unwrap();

        assert!(matches!(store.add("", None), Err(TaskError::EmptyText)));
        assert!(matches!(store.add("   ", None), Err(TaskError::EmptyText)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_ids_are_unique_within_same_millisecond() {
        let mut store = create_test_store();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

        let a = store.add_at("a", None, now).unwrap();
        let b = store.add_at("b", None, now).unwrap();
        let c = store.add_at("c", None, now - Duration::seconds(10)).unwrap();

        assert_eq!(a.id, TaskId(now.timestamp_millis()));
        assert_eq!(b.id, TaskId(now.timestamp_millis() + 1));
        assert_eq!(c.id, TaskId(now.timestamp_millis() + 2));
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut store = create_test_store();
        let task = store.add("Task", None).unwrap();

        assert_eq!(store.toggle_complete(task.id).unwrap(), Some(true));
        assert!(store.get(task.id).unwrap().completed);
        assert_eq!(store.toggle_complete(task.id).unwrap(), Some(false));
        assert!(!store.get(task.id).unwrap().completed);
    }

    #[test]
    fn test_toggle_unknown_id_is_noop() {
        let mut store = create_test_store();
        store.add("Task", None).unwrap();
        let before = store.tasks().to_vec();

        assert_eq!(store.toggle_complete(TaskId(-1)).unwrap(), None);
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_edit_replaces_given_fields() {
        let mut store = create_test_store();
        let deadline = Local::now().naive_local() + Duration::days(2);
        let task = store.add("Old", Some(deadline)).unwrap();

        let new_deadline = deadline + Duration::hours(3);
        let updated = store
            .edit(task.id, Some("New"), Some(new_deadline))
            .unwrap()
            .unwrap();

        assert_eq!(updated.text, "New");
        assert_eq!(updated.deadline(), task.deadline().map(|d| d + Duration::hours(3)));
        assert_eq!(store.get(task.id).unwrap(), &updated);
    }

    #[test]
    fn test_edit_keeps_fields_for_blank_input() {
        let mut store = create_test_store();
        let deadline = Local::now().naive_local() + Duration::days(2);
        let task = store.add("Keep", Some(deadline)).unwrap();

        let updated = store.edit(task.id, Some("   "), None).unwrap().unwrap();
        assert_eq!(updated.text, "Keep");
        assert_eq!(updated.time, task.time);

        let updated = store.edit(task.id, None, None).unwrap().unwrap();
        assert_eq!(updated, task);
    }

    #[test]
    fn test_edit_unknown_id_is_noop() {
        let mut store = create_test_store();
        assert_eq!(store.edit(TaskId(7), Some("x"), None).unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut store = create_test_store();
        let keep = store.add("Keep", None).unwrap();
        let gone = store.add("Gone", None).unwrap();

        assert!(store.delete(gone.id).unwrap());
        assert!(!store.delete(gone.id).unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].id, keep.id);
    }

    #[test]
    fn test_persist_then_load_round_trips() {
        let mut store = create_test_store();
        store.add("One", None).unwrap();
        let deadline = Local::now().naive_local() + Duration::hours(5);
        let two = store.add("Two", Some(deadline)).unwrap();
        store.toggle_complete(two.id).unwrap();
        let before = store.tasks().to_vec();

        store.persist().unwrap();
        store.load().unwrap();

        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_load_survives_corrupt_blob() {
        for raw in ["{not json", "{\"id\": 1}", "null", "42", ""] {
            let mut store = TaskStore::new(Box::new(MemoryBlobStore::with_value(TASKS_KEY, raw)));
            store.load().unwrap();
            assert!(store.is_empty(), "expected empty list for {:?}", raw);
        }
    }

    #[test]
    fn test_load_skips_bad_records() {
        let raw = r#"[
            {"id": 2, "text": "Good", "time": "", "completed": false, "createdAt": "2025-03-01T09:00:00.000Z"},
            {"text": "no id"},
            "just a string",
            {"id": 1, "text": "Also good", "time": "2025-03-02T10:00", "completed": true, "createdAt": "2025-03-01T08:00:00.000Z"}
        ]"#;
        let mut store = TaskStore::new(Box::new(MemoryBlobStore::with_value(TASKS_KEY, raw)));
        store.load().unwrap();

        let texts: Vec<&str> = store.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Good", "Also good"]);
    }

    #[test]
    fn test_next_persist_overwrites_corrupt_blob() {
        let mut store = TaskStore::new(Box::new(MemoryBlobStore::with_value(TASKS_KEY, "garbage")));
        store.load().unwrap();
        store.add("Fresh", None).unwrap();

        let raw = stored_json(&store).unwrap();
        let parsed: Vec<Task> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].text, "Fresh");
    }

    #[test]
    fn test_loaded_ids_keep_increasing() {
        let raw = r#"[{"id": 9999999999999, "text": "Future", "completed": false, "createdAt": ""}]"#;
        let mut store = TaskStore::new(Box::new(MemoryBlobStore::with_value(TASKS_KEY, raw)));
        store.load().unwrap();

        let task = store.add("Next", None).unwrap();
        assert_eq!(task.id, TaskId(10000000000000));
    }

    #[test]
    fn test_open_with_file_backend() {
        let temp_dir = tempfile::tempdir().unwrap();

        {
            let mut store = TaskStore::open(Box::new(FileBlobStore::new(temp_dir.path()))).unwrap();
            assert!(store.is_empty());
            store.add("Persisted", None).unwrap();
        }

        let store = TaskStore::open(Box::new(FileBlobStore::new(temp_dir.path()))).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].text, "Persisted");
    }

    #[test]
    fn test_toggling_overdue_task_moves_it_to_completed() {
        let mut store = create_test_store();
        let now = Local::now().naive_local();
        let task = store.add("Late", Some(now - Duration::hours(1))).unwrap();

        assert_eq!(filter_tasks(store.tasks(), Filter::Overdue, now).len(), 1);

        store.toggle_complete(task.id).unwrap();

        assert!(filter_tasks(store.tasks(), Filter::Overdue, now).is_empty());
        assert!(filter_tasks(store.tasks(), Filter::Pending, now).is_empty());
        assert_eq!(filter_tasks(store.tasks(), Filter::Completed, now).len(), 1);
    }

    #[test]
    fn test_failed_write_leaves_memory_and_storage_unchanged() {
        let (mut store, fail_writes) = create_flaky_store();
        let first = store.add("First", None).unwrap();
        let second = store.add("Second", None).unwrap();
        let before = store.tasks().to_vec();
        let stored_before = stored_json(&store);

        fail_writes.set(true);

        assert!(matches!(store.add("Buy milk", None), Err(TaskError::Storage(_))));
        assert!(matches!(store.toggle_complete(first.id), Err(TaskError::Storage(_))));
        assert!(matches!(
            store.edit(second.id, Some("Renamed"), None),
            Err(TaskError::Storage(_))
        ));
        assert!(matches!(store.delete(first.id), Err(TaskError::Storage(_))));

        assert_eq!(store.tasks(), before.as_slice());
        assert_eq!(stored_json(&store), stored_before);
    }

    #[test]
    fn test_failed_add_does_not_use_up_the_id() {
        let (mut store, fail_writes) = create_flaky_store();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

        fail_writes.set(true);
        assert!(store.add_at("Lost", None, now).is_err());

        fail_writes.set(false);
        let task = store.add_at("Kept", None, now).unwrap();
        assert_eq!(task.id, TaskId(now.timestamp_millis()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_largest_stored_id_does_not_overflow() {
        let raw = format!(
            r#"[{{"id": {}, "text": "Last", "completed": false, "createdAt": ""}}]"#,
            i64::MAX
        );
        let mut store = TaskStore::new(Box::new(MemoryBlobStore::with_value(TASKS_KEY, &raw)));
        store.load().unwrap();

        assert!(matches!(store.add("Next", None), Err(TaskError::Storage(_))));
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].text, "Last");
    }

    #[test]
    fn test_id_just_below_limit_is_still_usable() {
        let raw = format!(
            r#"[{{"id": {}, "text": "Almost", "completed": false, "createdAt": ""}}]"#,
            i64::MAX - 1
        );
        let mut store = TaskStore::new(Box::new(MemoryBlobStore::with_value(TASKS_KEY, &raw)));
        store.load().unwrap();

        let task = store.add("Next", None).unwrap();
        assert_eq!(task.id, TaskId(i64::MAX));
    }
}
