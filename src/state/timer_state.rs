//! Pomodoro timer state and transition rules
//!
//! `TimerState` has no clock of its own. The scheduler decides when a second
//! has passed and calls [`TimerState::tick`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default work phase length in minutes
pub const DEFAULT_WORK_MINUTES: u32 = 25;
/// Default short break length in minutes
pub const DEFAULT_SHORT_BREAK_MINUTES: u32 = 5;
/// Shortest duration a phase can be adjusted down to
pub const MIN_PHASE_MINUTES: u32 = 1;

/// The two timer phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PhaseKind {
    Work,
    ShortBreak,
}

impl PhaseKind {
    /// Wire name of the phase (`"work"` or `"shortBreak"`)
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseKind::Work => "work",
            PhaseKind::ShortBreak => "shortBreak",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhaseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(PhaseKind::Work),
            "shortBreak" => Ok(PhaseKind::ShortBreak),
            other => Err(format!("unknown phase: {}", other)),
        }
    }
}

/// Minutes per phase. Every value is at least [`MIN_PHASE_MINUTES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPhaseDurations")]
pub struct PhaseDurations {
    work: u32,
    short_break: u32,
}

impl PhaseDurations {
    /// Build durations, replacing zero values with the defaults
    pub fn new(work: u32, short_break: u32) -> Self {
        Self {
            work: if work >= MIN_PHASE_MINUTES { work } else { DEFAULT_WORK_MINUTES },
            short_break: if short_break >= MIN_PHASE_MINUTES {
                short_break
            } else {
                DEFAULT_SHORT_BREAK_MINUTES
            },
        }
    }

    /// Minutes configured for a phase
    pub fn get(&self, phase: PhaseKind) -> u32 {
        match phase {
            PhaseKind::Work => self.work,
            PhaseKind::ShortBreak => self.short_break,
        }
    }

    /// Length of a phase in seconds
    pub fn seconds(&self, phase: PhaseKind) -> u32 {
        self.get(phase).saturating_mul(60)
    }

    /// Store a new length; values below the floor are rejected
    fn set(&mut self, phase: PhaseKind, minutes: u32) -> bool {
        if minutes < MIN_PHASE_MINUTES {
            return false;
        }
        match phase {
            PhaseKind::Work => self.work = minutes,
            PhaseKind::ShortBreak => self.short_break = minutes,
        }
        true
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPhaseDurations {
    work: u32,
    short_break: u32,
}

impl TryFrom<RawPhaseDurations> for PhaseDurations {
    type Error = String;

    fn try_from(raw: RawPhaseDurations) -> Result<Self, Self::Error> {
        if raw.work < MIN_PHASE_MINUTES || raw.short_break < MIN_PHASE_MINUTES {
            return Err(format!(
                "phase durations must be at least {} minute",
                MIN_PHASE_MINUTES
            ));
        }
        Ok(Self {
            work: raw.work,
            short_break: raw.short_break,
        })
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            work: DEFAULT_WORK_MINUTES,
            short_break: DEFAULT_SHORT_BREAK_MINUTES,
        }
    }
}

/// Countdown state for the work / short break cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    durations: PhaseDurations,
    current_phase: PhaseKind,
    remaining_seconds: u32,
    running: bool,
    completed_cycles: u32,
}

impl TimerState {
    /// Create a stopped timer at the start of a work phase with default durations
    pub fn new() -> Self {
        Self::with_durations(PhaseDurations::default())
    }

    /// Create a stopped timer at the start of a work phase
    pub fn with_durations(durations: PhaseDurations) -> Self {
        Self {
            durations,
            current_phase: PhaseKind::Work,
            remaining_seconds: durations.seconds(PhaseKind::Work),
            running: false,
            completed_cycles: 0,
        }
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    pub fn current_phase(&self) -> PhaseKind {
        self.current_phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    /// Flip between running and stopped
    pub fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    /// Stop and rewind to the full length of the current phase
    pub fn reset_to_current_phase(&mut self) {
        self.running = false;
        self.remaining_seconds = self.durations.seconds(self.current_phase);
    }

    /// Clear the cycle counter and go back to a stopped work phase
    pub fn hard_reset(&mut self) {
        self.completed_cycles = 0;
        self.set_phase(PhaseKind::Work);
    }

    /// Switch to `phase`, stopped and rewound
    pub fn set_phase(&mut self, phase: PhaseKind) {
        // Unreachable while the duration floor holds; a phase without a usable
        // length is never entered
        if self.durations.get(phase) < MIN_PHASE_MINUTES {
            return;
        }
        self.current_phase = phase;
        self.reset_to_current_phase();
    }

    /// Switch phase by wire name. Unknown names leave the state untouched.
    pub fn set_phase_named(&mut self, name: &str) -> bool {
        match name.parse::<PhaseKind>() {
            Ok(phase) => {
                self.set_phase(phase);
                true
            }
            Err(e) => {
                debug!("Ignoring phase switch: {}", e);
                false
            }
        }
    }

    /// Advance one second. Returns `true` when the phase expired on this tick
    /// and the tick source should stop.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
            false
        } else {
            self.on_phase_expired();
            true
        }
    }

    /// Natural end of a phase. A cycle only counts once its break has run out.
    pub fn on_phase_expired(&mut self) {
        self.running = false;

        match self.current_phase {
            PhaseKind::Work => {
                info!("Work phase finished, switching to short break");
                self.set_phase(PhaseKind::ShortBreak);
            }
            PhaseKind::ShortBreak => {
                self.completed_cycles += 1;
                info!("Short break finished, {} cycles completed", self.completed_cycles);
                self.set_phase(PhaseKind::Work);
            }
        }
    }

    /// Change a phase length by `delta_minutes`. Results below one minute are
    /// rejected as a whole. A stopped timer in that phase shows the new length
    /// immediately; a running countdown keeps going with the old one.
    pub fn adjust_duration(&mut self, phase: PhaseKind, delta_minutes: i64) {
        let new_duration = i64::from(self.durations.get(phase)).saturating_add(delta_minutes);

        let Ok(minutes) = u32::try_from(new_duration) else {
            debug!("Rejected {} duration of {} minutes", phase, new_duration);
            return;
        };
        if !self.durations.set(phase, minutes) {
            debug!("Rejected {} duration of {} minutes", phase, new_duration);
            return;
        }

        if self.current_phase == phase && !self.running {
            self.remaining_seconds = self.durations.seconds(phase);
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> TimerState {
        let mut state = TimerState::new();
        state.toggle_running();
        state
    }

    #[test]
    fn starts_stopped_in_work_with_defaults() {
        let state = TimerState::new();
        assert_eq!(state.current_phase(), PhaseKind::Work);
        assert_eq!(state.remaining_seconds(), 1500);
        assert!(!state.is_running());
        assert_eq!(state.completed_cycles(), 0);
        assert_eq!(state.durations().get(PhaseKind::ShortBreak), 5);
    }

    #[test]
    fn zero_durations_fall_back_to_defaults() {
        let durations = PhaseDurations::new(0, 0);
        assert_eq!(durations, PhaseDurations::default());
        assert_eq!(PhaseDurations::new(50, 10).get(PhaseKind::Work), 50);
    }

    #[test]
    fn deserializing_durations_enforces_the_floor() {
        let durations: PhaseDurations =
            serde_json::from_str(r#"{"work":50,"shortBreak":10}"#).unwrap();
        assert_eq!(durations, PhaseDurations::new(50, 10));

        assert!(serde_json::from_str::<PhaseDurations>(r#"{"work":0,"shortBreak":5}"#).is_err());
        assert!(serde_json::from_str::<PhaseDurations>(r#"{"work":25,"shortBreak":0}"#).is_err());
    }

    #[test]
    fn tick_is_ignored_while_stopped() {
        let mut state = TimerState::new();
        assert!(!state.tick());
        assert_eq!(state.remaining_seconds(), 1500);
    }

    #[test]
    fn ticks_count_down_by_one() {
        let mut state = running();
        for expected in (1490..1500).rev() {
            assert!(!state.tick());
            assert_eq!(state.remaining_seconds(), expected);
        }
    }

    #[test]
    fn work_expiry_moves_to_break_without_counting() {
        let mut state = running();
        for _ in 0..1500 {
            assert!(!state.tick());
        }
        // Reaching zero is not yet the transition
        assert_eq!(state.remaining_seconds(), 0);
        assert_eq!(state.current_phase(), PhaseKind::Work);

        assert!(state.tick());
        assert_eq!(state.current_phase(), PhaseKind::ShortBreak);
        assert!(!state.is_running());
        assert_eq!(state.completed_cycles(), 0);
        assert_eq!(state.remaining_seconds(), 300);
    }

    #[test]
    fn break_expiry_completes_a_cycle() {
        let mut state = running();
        for _ in 0..=1500 {
            state.tick();
        }
        state.toggle_running();
        for _ in 0..300 {
            assert!(!state.tick());
        }
        assert!(state.tick());
        assert_eq!(state.current_phase(), PhaseKind::Work);
        assert!(!state.is_running());
        assert_eq!(state.completed_cycles(), 1);
        assert_eq!(state.remaining_seconds(), 1500);
    }

    #[test]
    fn manual_switch_never_counts_a_cycle() {
        let mut state = running();
        state.set_phase(PhaseKind::ShortBreak);
        state.set_phase(PhaseKind::Work);
        assert_eq!(state.completed_cycles(), 0);
        assert!(!state.is_running());
    }

    #[test]
    fn hard_reset_restores_initial_work_phase() {
        let mut state = running();
        state.set_phase(PhaseKind::ShortBreak);
        state.toggle_running();
        state.on_phase_expired();
        state.set_phase(PhaseKind::ShortBreak);
        state.toggle_running();
        state.tick();
        state.adjust_duration(PhaseKind::Work, 5);

        state.hard_reset();
        assert_eq!(state.current_phase(), PhaseKind::Work);
        assert!(!state.is_running());
        assert_eq!(state.completed_cycles(), 0);
        assert_eq!(state.remaining_seconds(), 30 * 60);
    }

    #[test]
    fn reset_to_current_phase_is_idempotent() {
        let mut state = running();
        state.tick();
        state.reset_to_current_phase();
        let once = state.clone();
        state.reset_to_current_phase();
        assert_eq!(state, once);
        assert_eq!(state.remaining_seconds(), 1500);
    }

    #[test]
    fn unknown_phase_name_is_a_no_op() {
        let mut state = running();
        state.tick();
        let before = state.clone();
        assert!(!state.set_phase_named("longBreak"));
        assert_eq!(state, before);

        assert!(state.set_phase_named("shortBreak"));
        assert_eq!(state.current_phase(), PhaseKind::ShortBreak);
    }

    #[test]
    fn adjustment_below_floor_is_rejected_whole() {
        let mut state = TimerState::new();
        state.adjust_duration(PhaseKind::Work, -30);
        assert_eq!(state.durations().get(PhaseKind::Work), 25);

        state.adjust_duration(PhaseKind::Work, -24);
        assert_eq!(state.durations().get(PhaseKind::Work), 1);
        assert_eq!(state.remaining_seconds(), 60);

        state.adjust_duration(PhaseKind::Work, -1);
        assert_eq!(state.durations().get(PhaseKind::Work), 1);
    }

    #[test]
    fn durations_never_drop_below_one_minute() {
        let mut state = TimerState::new();
        let deltas = [-3, -40, 7, -100, 2, -9, -1, i64::MIN, 15, -2, i64::MAX, -17];
        for delta in deltas {
            state.adjust_duration(PhaseKind::ShortBreak, delta);
            assert!(state.durations().get(PhaseKind::ShortBreak) >= MIN_PHASE_MINUTES);
        }
    }

    #[test]
    fn adjusting_while_running_keeps_the_countdown() {
        let mut state = running();
        state.tick();
        state.adjust_duration(PhaseKind::Work, 5);
        assert_eq!(state.durations().get(PhaseKind::Work), 30);
        assert_eq!(state.remaining_seconds(), 1499);

        // Next phase start picks the stored length up
        state.reset_to_current_phase();
        assert_eq!(state.remaining_seconds(), 1800);
    }

    #[test]
    fn adjusting_the_other_phase_leaves_the_display_alone() {
        let mut state = TimerState::new();
        state.adjust_duration(PhaseKind::ShortBreak, 3);
        assert_eq!(state.remaining_seconds(), 1500);
        state.set_phase(PhaseKind::ShortBreak);
        assert_eq!(state.remaining_seconds(), 480);
    }

    #[test]
    fn double_toggle_restores_running_flag() {
        let mut state = TimerState::new();
        state.toggle_running();
        state.toggle_running();
        assert!(!state.is_running());
        assert_eq!(state.remaining_seconds(), 1500);
    }

    #[test]
    fn phase_names_round_trip() {
        assert_eq!("work".parse::<PhaseKind>(), Ok(PhaseKind::Work));
        assert_eq!(PhaseKind::ShortBreak.to_string(), "shortBreak");
        assert_eq!(
            serde_json::to_string(&PhaseKind::ShortBreak).unwrap(),
            "\"shortBreak\""
        );
    }
}
