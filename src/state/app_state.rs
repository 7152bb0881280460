//! Main application state management

use std::{
    fmt,
    str::FromStr,
    sync::{Arc, Mutex},
    time::Instant,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::PhaseDurations;
use crate::{
    services::{GroceryList, KeyValueStore, TodoList},
    tasks::TimerScheduler,
    utils::lock_or_recover,
};

/// The three tool tabs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Pomodoro,
    Todo,
    Grocery,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tab::Pomodoro => "pomodoro",
            Tab::Todo => "todo",
            Tab::Grocery => "grocery",
        })
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pomodoro" => Ok(Tab::Pomodoro),
            "todo" => Ok(Tab::Todo),
            "grocery" => Ok(Tab::Grocery),
            other => Err(format!("unknown tab: {}", other)),
        }
    }
}

/// Owns every tool. Handlers reach the tools only through this object.
pub struct AppState {
    pub pomodoro: TimerScheduler,
    pub todos: TodoList,
    pub groceries: GroceryList,
    active_tab: Mutex<Tab>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    /// Create the tools, loading the lists from `store`
    pub fn new(
        port: u16,
        host: String,
        durations: PhaseDurations,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            pomodoro: TimerScheduler::new(durations),
            todos: TodoList::new(Arc::clone(&store)),
            groceries: GroceryList::new(store),
            active_tab: Mutex::new(Tab::default()),
            start_time: Instant::now(),
            port,
            host,
        }
    }

    pub fn active_tab(&self) -> Tab {
        *lock_or_recover(&self.active_tab)
    }

    /// Make `tab` active and republish the list shown on it
    pub fn switch_tab(&self, tab: Tab) {
        *lock_or_recover(&self.active_tab) = tab;
        info!("Switched to {} tab", tab);

        match tab {
            Tab::Todo => self.todos.publish(),
            Tab::Grocery => self.groceries.publish(),
            Tab::Pomodoro => {}
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;
        
        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemoryStore;

    fn app() -> AppState {
        AppState::new(0, "127.0.0.1".to_string(), PhaseDurations::default(), Arc::new(MemoryStore::new()))
    }

    #[test]
    fn starts_on_pomodoro_tab() {
        assert_eq!(app().active_tab(), Tab::Pomodoro);
    }

    #[test]
    fn switching_tab_republishes_that_list_only() {
        let app = app();
        let todo_count = Arc::new(Mutex::new(0));
        let grocery_count = Arc::new(Mutex::new(0));

        let sink = Arc::clone(&todo_count);
        app.todos.subscribe(move |_| *sink.lock().unwrap() += 1);
        let sink = Arc::clone(&grocery_count);
        app.groceries.subscribe(move |_| *sink.lock().unwrap() += 1);

        app.switch_tab(Tab::Todo);
        assert_eq!(app.active_tab(), Tab::Todo);
        assert_eq!(*todo_count.lock().unwrap(), 2);
        assert_eq!(*grocery_count.lock().unwrap(), 1);

        app.switch_tab(Tab::Pomodoro);
        assert_eq!(*todo_count.lock().unwrap(), 2);
        assert_eq!(*grocery_count.lock().unwrap(), 1);
    }

    #[test]
    fn tab_names_parse() {
        assert_eq!("grocery".parse::<Tab>(), Ok(Tab::Grocery));
        assert!("settings".parse::<Tab>().is_err());
    }

    #[test]
    fn uptime_is_reported_in_seconds_at_start() {
        assert!(app().get_uptime().ends_with('s'));
    }
}
