//! Background tasks module
//! 
//! This module contains the tick source and the pomodoro scheduler it drives.

pub mod tick_source;
pub mod timer_scheduler;

// Re-export main types
pub use tick_source::TickSource;
pub use timer_scheduler::{TimerScheduler, TICK_PERIOD};
