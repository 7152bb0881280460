//! State management module
//! 
//! This module contains the timer state machine, the snapshots handed to
//! observers and the top-level application object.

pub mod app_state;
pub mod observers;
pub mod snapshot;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, Tab};
pub use observers::{Observer, ObserverRegistry, SubscriptionId};
pub use snapshot::{format_time, TimerSnapshot};
pub use timer_state::{PhaseDurations, PhaseKind, TimerState};
