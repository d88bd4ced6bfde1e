//! Pomodoro engine.
//!
//! Cycles Work -> ShortBreak -> Work -> ... with every fourth completed work
//! session followed by a LongBreak instead. Each tick counts down one nominal
//! step, so like the countdown timer it drifts under scheduling jitter.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::EngineKind;
use crate::events::Event;
use crate::format::format_pomodoro;

/// Completed work sessions between long breaks.
pub const SESSIONS_PER_LONG_BREAK: u64 = 4;

/// Default tick period.
pub const DEFAULT_STEP_MS: u64 = 1000;

fn default_step_ms() -> u64 {
    DEFAULT_STEP_MS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work Session",
            Phase::ShortBreak => "Short Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PomodoroState {
    Idle,
    Running,
    Paused,
}

/// Phase lengths in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDurations {
    pub work_min: u32,
    pub short_break_min: u32,
    pub long_break_min: u32,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            work_min: 25,
            short_break_min: 5,
            long_break_min: 15,
        }
    }
}

impl PhaseDurations {
    pub fn secs_for(&self, phase: Phase) -> u64 {
        let minutes = match phase {
            Phase::Work => self.work_min,
            Phase::ShortBreak => self.short_break_min,
            Phase::LongBreak => self.long_break_min,
        };
        minutes as u64 * 60
    }
}

/// Cumulative, persisted counters. Never decremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CycleCounters {
    pub sessions_completed: u64,
    pub breaks_taken: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pomodoro {
    phase: Phase,
    state: PomodoroState,
    remaining_secs: u64,
    total_secs: u64,
    durations: PhaseDurations,
    counters: CycleCounters,
    #[serde(default = "default_step_ms")]
    step_ms: u64,
    /// Ticked milliseconds not yet worth a whole second.
    #[serde(default)]
    carry_ms: u64,
}

impl Pomodoro {
    /// Ready to start a work session of the configured length.
    pub fn new(durations: PhaseDurations, counters: CycleCounters) -> Self {
        let work = durations.secs_for(Phase::Work);
        Self {
            phase: Phase::Work,
            state: PomodoroState::Idle,
            remaining_secs: work,
            total_secs: work,
            durations,
            counters,
            step_ms: DEFAULT_STEP_MS,
            carry_ms: 0,
        }
    }

    /// Milliseconds counted down per tick. Must match the period the engine
    /// is ticked at.
    pub fn with_step_ms(mut self, step_ms: u64) -> Self {
        self.step_ms = step_ms.max(1);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> PomodoroState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == PomodoroState::Running
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn durations(&self) -> PhaseDurations {
        self.durations
    }

    pub fn counters(&self) -> CycleCounters {
        self.counters
    }

    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    pub fn display(&self) -> String {
        format_pomodoro(self.remaining_secs)
    }

    /// `remaining / total`; 1.0 while waiting for the next phase to load.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 || self.remaining_secs == 0 {
            return 1.0;
        }
        self.remaining_secs as f64 / self.total_secs as f64
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.is_running() {
            return None;
        }
        if self.remaining_secs == 0 {
            self.load_phase();
        }
        if self.remaining_secs == 0 {
            return None;
        }
        self.state = PomodoroState::Running;
        tracing::debug!(phase = ?self.phase, remaining_secs = self.remaining_secs, "pomodoro started");
        Some(Event::EngineStarted {
            engine: EngineKind::Pomodoro,
            value_ms: self.remaining_secs * 1000,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.state = PomodoroState::Paused;
        Some(Event::EnginePaused {
            engine: EngineKind::Pomodoro,
            value_ms: self.remaining_secs * 1000,
            at: Utc::now(),
        })
    }

    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Back to a fresh work session. Counters are kept.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = PomodoroState::Idle;
        self.phase = Phase::Work;
        self.load_phase();
        Some(Event::EngineReset {
            engine: EngineKind::Pomodoro,
            at: Utc::now(),
        })
    }

    /// Count down one step. Whole seconds come off `remaining_secs` as the
    /// steps add up. On reaching zero the engine stops and advances to the
    /// next phase; the returned `PhaseAdvanced` event has `skipped: false`.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running() || self.remaining_secs == 0 {
            return None;
        }
        self.carry_ms += self.step_ms;
        let whole_secs = self.carry_ms / 1000;
        self.carry_ms %= 1000;
        self.remaining_secs = self.remaining_secs.saturating_sub(whole_secs);
        if self.remaining_secs > 0 {
            return None;
        }
        self.state = PomodoroState::Idle;
        Some(self.advance(false))
    }

    /// Advance immediately, without the alarm.
    pub fn skip(&mut self) -> Option<Event> {
        self.pause();
        self.state = PomodoroState::Idle;
        Some(self.advance(true))
    }

    /// Update the configured lengths. An idle engine that has not counted
    /// anything yet picks the new length up immediately.
    pub fn set_durations(&mut self, durations: PhaseDurations) {
        self.durations = durations;
        if self.state == PomodoroState::Idle
            && self.remaining_secs == self.total_secs
            && self.carry_ms == 0
        {
            self.load_phase();
        }
    }

    fn load_phase(&mut self) {
        self.total_secs = self.durations.secs_for(self.phase);
        self.remaining_secs = self.total_secs;
        self.carry_ms = 0;
    }

    fn advance(&mut self, skipped: bool) -> Event {
        let from = self.phase;
        self.phase = match from {
            Phase::Work => {
                self.counters.sessions_completed += 1;
                if self.counters.sessions_completed % SESSIONS_PER_LONG_BREAK == 0 {
                    Phase::LongBreak
                } else {
                    self.counters.breaks_taken += 1;
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        };
        // Forces the next start to load the new phase's length.
        self.remaining_secs = 0;
        self.carry_ms = 0;
        tracing::info!(
            from = ?from,
            to = ?self.phase,
            sessions = self.counters.sessions_completed,
            skipped,
            "pomodoro phase advanced"
        );
        Event::PhaseAdvanced {
            from,
            to: self.phase,
            sessions_completed: self.counters.sessions_completed,
            breaks_taken: self.counters.breaks_taken,
            skipped,
            at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn short() -> PhaseDurations {
        PhaseDurations {
            work_min: 1,
            short_break_min: 1,
            long_break_min: 2,
        }
    }

    fn run_to_expiry(p: &mut Pomodoro) -> Option<Event> {
        p.start();
        let mut last = None;
        while p.is_running() {
            last = p.tick();
        }
        last
    }

    #[test]
    fn new_engine_shows_work_length() {
        let p = Pomodoro::new(PhaseDurations::default(), CycleCounters::default());
        assert_eq!(p.display(), "25:00");
        assert_eq!(p.phase(), Phase::Work);
        assert_eq!(p.state(), PomodoroState::Idle);
    }

    #[test]
    fn work_expiry_moves_to_short_break() {
        let mut p = Pomodoro::new(short(), CycleCounters::default());
        let event = run_to_expiry(&mut p).unwrap();
        assert!(matches!(
            event,
            Event::PhaseAdvanced { from: Phase::Work, to: Phase::ShortBreak, skipped: false, .. }
        ));
        assert_eq!(p.counters().sessions_completed, 1);
        assert_eq!(p.counters().breaks_taken, 1);
        assert_eq!(p.remaining_secs(), 0);
        assert_eq!(p.state(), PomodoroState::Idle);
    }

    #[test]
    fn next_start_loads_the_new_phase_length() {
        let mut p = Pomodoro::new(short(), CycleCounters { sessions_completed: 3, breaks_taken: 3 });
        run_to_expiry(&mut p);
        assert_eq!(p.phase(), Phase::LongBreak);
        p.start();
        assert_eq!(p.total_secs(), 120);
        assert_eq!(p.remaining_secs(), 120);
    }

    #[test]
    fn fourth_session_goes_to_long_break_without_counting_a_break() {
        let mut p = Pomodoro::new(short(), CycleCounters { sessions_completed: 3, breaks_taken: 3 });
        p.skip();
        assert_eq!(p.phase(), Phase::LongBreak);
        assert_eq!(p.counters(), CycleCounters { sessions_completed: 4, breaks_taken: 3 });
    }

    #[test]
    fn breaks_return_to_work() {
        let mut p = Pomodoro::new(short(), CycleCounters::default());
        p.skip();
        assert_eq!(p.phase(), Phase::ShortBreak);
        p.skip();
        assert_eq!(p.phase(), Phase::Work);
        assert_eq!(p.counters().sessions_completed, 1);
    }

    #[test]
    fn skip_pauses_a_running_session() {
        let mut p = Pomodoro::new(short(), CycleCounters::default());
        p.start();
        p.tick();
        assert!(matches!(p.skip(), Some(Event::PhaseAdvanced { skipped: true, .. })));
        assert!(!p.is_running());
        assert!(p.tick().is_none());
    }

    #[test]
    fn pause_preserves_remaining() {
        let mut p = Pomodoro::new(short(), CycleCounters::default());
        p.start();
        p.tick();
        p.tick();
        p.pause();
        assert_eq!(p.state(), PomodoroState::Paused);
        assert!(p.tick().is_none());
        p.start();
        assert_eq!(p.remaining_secs(), 58);
    }

    #[test]
    fn reset_returns_to_work_but_keeps_counters() {
        let mut p = Pomodoro::new(short(), CycleCounters::default());
        p.skip();
        p.reset();
        assert_eq!(p.phase(), Phase::Work);
        assert_eq!(p.remaining_secs(), 60);
        assert_eq!(p.total_secs(), 60);
        assert_eq!(p.counters().sessions_completed, 1);
    }

    #[test]
    fn untouched_idle_engine_picks_up_new_durations() {
        let mut p = Pomodoro::new(PhaseDurations::default(), CycleCounters::default());
        p.set_durations(PhaseDurations { work_min: 50, ..PhaseDurations::default() });
        assert_eq!(p.display(), "50:00");

        p.start();
        p.tick();
        p.pause();
        p.set_durations(short());
        assert_eq!(p.remaining_secs(), 50 * 60 - 1);
    }

    #[test]
    fn sub_second_steps_add_up_to_whole_seconds() {
        let mut p = Pomodoro::new(short(), CycleCounters::default()).with_step_ms(250);
        p.start();
        for _ in 0..3 {
            p.tick();
        }
        assert_eq!(p.remaining_secs(), 60);
        p.tick();
        assert_eq!(p.remaining_secs(), 59);
        // Partial progress survives a pause.
        p.tick();
        p.pause();
        p.start();
        for _ in 0..3 {
            p.tick();
        }
        assert_eq!(p.remaining_secs(), 58);
    }

    #[test]
    fn multi_second_steps_finish_the_phase_on_time() {
        let mut p = Pomodoro::new(short(), CycleCounters::default()).with_step_ms(2_500);
        p.start();
        let mut ticks = 0;
        while p.is_running() {
            p.tick();
            ticks += 1;
        }
        assert_eq!(ticks, 24);
        assert_eq!(p.phase(), Phase::ShortBreak);
    }

    proptest! {
        #[test]
        fn long_breaks_every_fourth_session(k in 0u64..50, n in 1u64..40) {
            let start = CycleCounters { sessions_completed: 4 * k, breaks_taken: 0 };
            let mut p = Pomodoro::new(short(), start);
            let mut long_breaks = 0;
            let mut short_breaks = 0;
            for _ in 0..n {
                prop_assert_eq!(p.phase(), Phase::Work);
                match run_to_expiry(&mut p) {
                    Some(Event::PhaseAdvanced { to: Phase::LongBreak, .. }) => long_breaks += 1,
                    Some(Event::PhaseAdvanced { to: Phase::ShortBreak, .. }) => short_breaks += 1,
                    other => prop_assert!(false, "unexpected {:?}", other),
                }
                p.skip();
            }
            prop_assert_eq!(p.counters().sessions_completed, 4 * k + n);
            prop_assert_eq!(long_breaks, n / 4);
            prop_assert_eq!(short_breaks, n - n / 4);
            prop_assert_eq!(p.counters().breaks_taken, n - n / 4);
        }
    }
}
