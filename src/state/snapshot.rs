//! Timer view-state handed to observers

use serde::{Deserialize, Serialize};

use super::{PhaseDurations, PhaseKind, TimerState};

/// Immutable, display-ready copy of the timer state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    /// Remaining time as zero-padded `MM:SS`
    pub time_display: String,
    pub is_running: bool,
    pub current_phase: PhaseKind,
    pub completed_cycles: u32,
    pub current_durations: PhaseDurations,
}

impl TimerSnapshot {
    /// Capture the current state of a timer
    pub fn capture(state: &TimerState) -> Self {
        Self {
            time_display: format_time(state.remaining_seconds()),
            is_running: state.is_running(),
            current_phase: state.current_phase(),
            completed_cycles: state.completed_cycles(),
            current_durations: state.durations(),
        }
    }
}

impl From<&TimerState> for TimerSnapshot {
    fn from(state: &TimerState) -> Self {
        Self::capture(state)
    }
}

/// Format seconds as `MM:SS`. Minutes are not wrapped into hours.
pub fn format_time(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero_padded_minutes_and_seconds() {
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(120 * 60 + 9), "120:09");
    }

    #[test]
    fn serializes_with_view_field_names() {
        let snapshot = TimerSnapshot::capture(&TimerState::new());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "timeDisplay": "25:00",
                "isRunning": false,
                "currentPhase": "work",
                "completedCycles": 0,
                "currentDurations": { "work": 25, "shortBreak": 5 }
            })
        );
    }
}
