//! In-memory task store.
//!
//! The [`TaskStore`] is the single persistence boundary for task records.
//! Absence is typed: every lookup-style operation returns `Option`, and the
//! HTTP layer decides how "no such task" is presented. Ids are assigned
//! sequentially starting at 1 and never reused within a process lifetime.

use std::collections::BTreeMap;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use taskboard_model::{Task, TaskAttributes, TaskId};

/// Interior state guarded by one lock so id assignment and insertion are a
/// single atomic step.
#[derive(Debug, Default)]
struct Inner {
    tasks: BTreeMap<TaskId, Task>,
    next_id: i64,
}

/// In-memory task store, thread-safe via [`RwLock`].
#[derive(Debug)]
pub struct TaskStore {
    inner: RwLock<Inner>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Creates a new, empty task store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                tasks: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Persists a new task from `attrs`, assigning the next id.
    ///
    /// Increases the count by exactly one and returns the stored record.
    pub async fn create(&self, attrs: TaskAttributes) -> Task {
        let mut inner = self.inner.write().await;
        let id = TaskId::new(inner.next_id);
        inner.next_id += 1;
        let task = Task {
            id,
            name: attrs.name,
            description: attrs.description,
            completion_date: attrs.completion_date,
        };
        inner.tasks.insert(id, task.clone());
        task
    }

    /// Returns the task with the given id, if present.
    pub async fn get(&self, id: TaskId) -> Option<Task> {
        let inner = self.inner.read().await;
        inner.tasks.get(&id).cloned()
    }

    /// Returns the first task (in id order) whose name matches exactly.
    pub async fn find_by_name(&self, name: &str) -> Option<Task> {
        let inner = self.inner.read().await;
        inner.tasks.values().find(|t| t.name == name).cloned()
    }

    /// Applies `attrs` to the task with the given id.
    ///
    /// Returns the updated record, or `None` (with no mutation) when the id
    /// is absent. The count is unchanged either way.
    pub async fn update(&self, id: TaskId, attrs: TaskAttributes) -> Option<Task> {
        let mut inner = self.inner.write().await;
        let task = inner.tasks.get_mut(&id)?;
        task.apply(attrs);
        Some(task.clone())
    }

    /// Removes the task with the given id, returning it if it existed.
    pub async fn delete(&self, id: TaskId) -> Option<Task> {
        let mut inner = self.inner.write().await;
        inner.tasks.remove(&id)
    }

    /// Flips the completion state of the task with the given id.
    ///
    /// An incomplete task gets the current UTC timestamp as its completion
    /// date; a completed task has the date cleared. Returns the updated
    /// record, or `None` when the id is absent.
    pub async fn toggle_complete(&self, id: TaskId) -> Option<Task> {
        let mut inner = self.inner.write().await;
        let task = inner.tasks.get_mut(&id)?;
        task.completion_date = match task.completion_date {
            None => Some(OffsetDateTime::now_utc()),
            Some(_) => None,
        };
        Some(task.clone())
    }

    /// Returns all tasks in id order.
    pub async fn list(&self) -> Vec<Task> {
        let inner = self.inner.read().await;
        inner.tasks.values().cloned().collect()
    }

    /// Returns the number of stored tasks.
    pub async fn count(&self) -> usize {
        let inner = self.inner.read().await;
        inner.tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn attrs(name: &str, description: &str) -> TaskAttributes {
        TaskAttributes {
            name: name.to_string(),
            description: description.to_string(),
            completion_date: None,
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids_and_counts() {
        let store = TaskStore::new();
        assert_eq!(store.count().await, 0);

        let first = store.create(attrs("first", "one")).await;
        let second = store.create(attrs("second", "two")).await;

        assert_eq!(first.id, TaskId::new(1));
        assert_eq!(second.id, TaskId::new(2));
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn get_returns_stored_record() {
        let store = TaskStore::new();
        let created = store
            .create(TaskAttributes {
                name: "new task".to_string(),
                description: "new task description".to_string(),
                completion_date: None,
            })
            .await;

        let fetched = store.get(created.id).await.unwrap();
        assert_eq!(fetched.description, "new task description");
        assert_eq!(fetched.completion_date, None);
    }

    #[tokio::test]
    async fn get_unknown_id_returns_none() {
        let store = TaskStore::new();
        store.create(attrs("only", "task")).await;
        assert!(store.get(TaskId::new(-1)).await.is_none());
        assert!(store.get(TaskId::new(99)).await.is_none());
    }

    #[tokio::test]
    async fn find_by_name_matches_exactly() {
        let store = TaskStore::new();
        store.create(attrs("groceries", "milk")).await;
        let wanted = store.create(attrs("laundry", "whites")).await;

        let found = store.find_by_name("laundry").await.unwrap();
        assert_eq!(found.id, wanted.id);
        assert!(store.find_by_name("laundr").await.is_none());
    }

    #[tokio::test]
    async fn update_overwrites_without_changing_count() {
        let store = TaskStore::new();
        let task = store.create(attrs("Test", "Created for testing")).await;

        let updated = store
            .update(task.id, attrs("Return", "items at Costco."))
            .await
            .unwrap();
        assert_eq!(updated.name, "Return");
        assert_eq!(store.count().await, 1);
        assert_eq!(store.get(task.id).await.unwrap().name, "Return");
    }

    #[tokio::test]
    async fn update_unknown_id_mutates_nothing() {
        let store = TaskStore::new();
        store.create(attrs("Test", "Created for testing")).await;

        let result = store.update(TaskId::new(-1), attrs("Other", "nope")).await;
        assert!(result.is_none());
        assert_eq!(store.count().await, 1);
        assert!(store.find_by_name("Other").await.is_none());
    }

    #[tokio::test]
    async fn delete_removes_each_existing_task() {
        let store = TaskStore::new();
        let first = store.create(attrs("Test", "Created for testing")).await;
        let second = store.create(attrs("Test2", "Created for testing")).await;

        assert!(store.delete(first.id).await.is_some());
        assert_eq!(store.count().await, 1);
        assert!(store.delete(second.id).await.is_some());
        assert_eq!(store.count().await, 0);
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_id_returns_none() {
        let store = TaskStore::new();
        assert!(store.delete(TaskId::new(7)).await.is_none());
    }

    #[tokio::test]
    async fn toggle_sets_completion_date_on_incomplete_task() {
        let store = TaskStore::new();
        let task = store
            .create(attrs("Test", "Created for testing complete"))
            .await;

        let toggled = store.toggle_complete(task.id).await.unwrap();
        assert!(toggled.completion_date.is_some());
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn toggle_clears_completion_date_on_completed_task() {
        let store = TaskStore::new();
        let task = store
            .create(TaskAttributes {
                name: "done".to_string(),
                description: String::new(),
                completion_date: Some(datetime!(2024-05-01 10:30 UTC)),
            })
            .await;

        let toggled = store.toggle_complete(task.id).await.unwrap();
        assert_eq!(toggled.completion_date, None);
    }

    #[tokio::test]
    async fn toggle_unknown_id_returns_none() {
        let store = TaskStore::new();
        assert!(store.toggle_complete(TaskId::new(3)).await.is_none());
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = TaskStore::new();
        let first = store.create(attrs("first", "")).await;
        store.delete(first.id).await;

        let second = store.create(attrs("second", "")).await;
        assert_eq!(second.id, TaskId::new(2));
    }

    #[tokio::test]
    async fn list_returns_tasks_in_id_order() {
        let store = TaskStore::new();
        store.create(attrs("a", "")).await;
        store.create(attrs("b", "")).await;
        store.create(attrs("c", "")).await;

        let names: Vec<String> = store.list().await.into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
