//! Task list backed by the key-value store

use std::{
    fmt,
    str::FromStr,
    sync::{Arc, Mutex},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use super::storage::{load_records, save_records, KeyValueStore};
use crate::{
    state::{ObserverRegistry, SubscriptionId},
    utils::lock_or_recover,
};

/// Storage namespace of the task list
pub const TODO_STORAGE_KEY: &str = "todoList";

/// A single task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Which tasks the snapshot shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TodoFilter {
    fn matches(&self, todo: &TodoItem) -> bool {
        match self {
            TodoFilter::All => true,
            TodoFilter::Active => !todo.completed,
            TodoFilter::Completed => todo.completed,
        }
    }
}

impl fmt::Display for TodoFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TodoFilter::All => "all",
            TodoFilter::Active => "active",
            TodoFilter::Completed => "completed",
        })
    }
}

impl FromStr for TodoFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TodoFilter::All),
            "active" => Ok(TodoFilter::Active),
            "completed" => Ok(TodoFilter::Completed),
            other => Err(format!("unknown filter: {}", other)),
        }
    }
}

/// View-state of the task list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoSnapshot {
    /// Tasks passing the current filter
    pub todos: Vec<TodoItem>,
    pub active_count: usize,
    pub total_count: usize,
    pub current_filter: TodoFilter,
}

struct TodoData {
    todos: Vec<TodoItem>,
    filter: TodoFilter,
}

impl TodoData {
    fn snapshot(&self) -> TodoSnapshot {
        TodoSnapshot {
            todos: self
                .todos
                .iter()
                .filter(|todo| self.filter.matches(todo))
                .cloned()
                .collect(),
            active_count: self.todos.iter().filter(|todo| !todo.completed).count(),
            total_count: self.todos.len(),
            current_filter: self.filter,
        }
    }
}

/// Task list tool
pub struct TodoList {
    data: Mutex<TodoData>,
    store: Arc<dyn KeyValueStore>,
    observers: ObserverRegistry<TodoSnapshot>,
}

impl TodoList {
    /// Load the stored tasks. Unreadable storage starts an empty list.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let todos = load_records(store.as_ref(), TODO_STORAGE_KEY).unwrap_or_else(|e| {
            error!("Failed to load task list: {:#}", e);
            Vec::new()
        });
        info!("Loaded {} tasks", todos.len());

        Self {
            data: Mutex::new(TodoData {
                todos,
                filter: TodoFilter::default(),
            }),
            store,
            observers: ObserverRegistry::new(),
        }
    }

    pub fn snapshot(&self) -> TodoSnapshot {
        lock_or_recover(&self.data).snapshot()
    }

    /// Register an observer and call it with the current snapshot
    pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
    where
        F: Fn(&TodoSnapshot) + Send + Sync + 'static,
    {
        let snapshot = self.snapshot();
        self.observers.subscribe_with(observer, &snapshot)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub fn publish(&self) {
        let snapshot = self.snapshot();
        self.observers.notify(&snapshot);
    }

    /// Add an active task. Blank text is ignored.
    pub fn add_todo(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        self.mutate(|data| {
            data.todos.push(TodoItem {
                id: Uuid::new_v4().to_string(),
                text: text.to_string(),
                completed: false,
                created_at: Utc::now(),
            });
            true
        });
    }

    /// Flip a task between active and completed
    pub fn toggle_todo(&self, id: &str) {
        self.mutate(|data| match data.todos.iter_mut().find(|todo| todo.id == id) {
            Some(todo) => {
                todo.completed = !todo.completed;
                true
            }
            None => false,
        });
    }

    pub fn remove_todo(&self, id: &str) {
        self.mutate(|data| {
            data.todos.retain(|todo| todo.id != id);
            true
        });
    }

    pub fn clear_completed(&self) {
        self.mutate(|data| {
            data.todos.retain(|todo| !todo.completed);
            true
        });
    }

    /// Change the view filter. Not persisted.
    pub fn set_filter(&self, filter: TodoFilter) {
        lock_or_recover(&self.data).filter = filter;
        self.publish();
    }

    /// Apply `change`; when it reports a modification, persist and publish
    fn mutate<F>(&self, change: F)
    where
        F: FnOnce(&mut TodoData) -> bool,
    {
        {
            let mut data = lock_or_recover(&self.data);
            if !change(&mut data) {
                return;
            }
            if let Err(e) = save_records(self.store.as_ref(), TODO_STORAGE_KEY, &data.todos) {
                error!("Failed to save task list: {:#}", e);
            }
        }
        self.publish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::storage::MemoryStore;

    fn list() -> (Arc<MemoryStore>, TodoList) {
        let store = Arc::new(MemoryStore::new());
        let list = TodoList::new(store.clone());
        (store, list)
    }

    fn first_id(list: &TodoList) -> String {
        list.snapshot().todos[0].id.clone()
    }

    #[test]
    fn adds_trimmed_tasks_and_ignores_blank_text() {
        let (_, list) = list();
        list.add_todo("  write report  ");
        list.add_todo("   ");

        let snapshot = list.snapshot();
        assert_eq!(snapshot.total_count, 1);
        assert_eq!(snapshot.active_count, 1);
        assert_eq!(snapshot.todos[0].text, "write report");
        assert!(!snapshot.todos[0].completed);
    }

    #[test]
    fn toggle_and_clear_completed() {
        let (_, list) = list();
        list.add_todo("a");
        list.add_todo("b");
        let id = first_id(&list);

        list.toggle_todo(&id);
        assert_eq!(list.snapshot().active_count, 1);

        list.clear_completed();
        let snapshot = list.snapshot();
        assert_eq!(snapshot.total_count, 1);
        assert_eq!(snapshot.todos[0].text, "b");
    }

    #[test]
    fn filter_changes_visible_tasks_but_not_counts() {
        let (_, list) = list();
        list.add_todo("a");
        list.add_todo("b");
        list.toggle_todo(&first_id(&list));

        list.set_filter(TodoFilter::Completed);
        let snapshot = list.snapshot();
        assert_eq!(snapshot.todos.len(), 1);
        assert_eq!(snapshot.todos[0].text, "a");
        assert_eq!(snapshot.total_count, 2);
        assert_eq!(snapshot.current_filter, TodoFilter::Completed);

        list.set_filter(TodoFilter::Active);
        assert_eq!(list.snapshot().todos[0].text, "b");
    }

    #[test]
    fn tasks_and_ids_survive_reload() {
        let (store, list) = list();
        list.add_todo("persist me");
        list.toggle_todo(&first_id(&list));
        let before = list.snapshot().todos;

        let reloaded = TodoList::new(store);
        assert_eq!(reloaded.snapshot().todos, before);
    }

    #[test]
    fn corrupt_storage_starts_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(TODO_STORAGE_KEY, "{broken").unwrap();
        let list = TodoList::new(store);
        assert_eq!(list.snapshot().total_count, 0);
    }

    #[test]
    fn observers_get_initial_and_change_snapshots() {
        let (_, list) = list();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        list.subscribe(move |snapshot| sink.lock().unwrap().push(snapshot.total_count));

        list.add_todo("a");
        list.toggle_todo("missing-id");
        list.remove_todo(&first_id(&list));
        assert_eq!(*seen.lock().unwrap(), vec![0, 1, 0]);
    }

    #[test]
    fn filter_names_parse() {
        assert_eq!("active".parse::<TodoFilter>(), Ok(TodoFilter::Active));
        assert!("done".parse::<TodoFilter>().is_err());
    }
}
