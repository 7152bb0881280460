//! Pomodoro Desk - a pomodoro timer, task list and shopping list
//! 
//! This library provides the work / short break timer state machine, the
//! scheduler that drives it once per second, and the two list tools, all
//! reachable through a small HTTP API.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, PhaseKind, TimerSnapshot, TimerState};
pub use tasks::TimerScheduler;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
