//! Read-only view of the widget for the render layer.

use serde::{Deserialize, Serialize};

use crate::laps::{AnalyticsSummary, ChartPoint, LapAnalytics, LapEntry};
use crate::router::View;
use crate::storage::{Settings, Theme};
use crate::timer::{
    Countdown, CountdownState, DurationInputs, Phase, PhaseDurations, Pomodoro, PomodoroState,
    Stopwatch, StopwatchState,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopwatchSnapshot {
    pub state: StopwatchState,
    pub elapsed_ms: u64,
    pub display: String,
    /// Newest first.
    pub laps: Vec<LapEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: CountdownState,
    pub remaining_ms: u64,
    pub total_ms: u64,
    pub display: String,
    /// Fraction of the run still remaining, 1.0 before any run.
    pub progress: f64,
    pub inputs: DurationInputs,
    pub inputs_locked: bool,
    pub expired_notice: bool,
    pub loop_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PomodoroSnapshot {
    pub state: PomodoroState,
    pub phase: Phase,
    pub phase_label: String,
    pub remaining_secs: u64,
    pub display: String,
    pub progress: f64,
    pub durations: PhaseDurations,
    pub sessions_completed: u64,
    pub breaks_taken: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub summary: AnalyticsSummary,
    pub chart: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferencesSnapshot {
    pub dark_mode: bool,
    pub theme: Theme,
    pub alarm_volume: u8,
    pub timer_loop: bool,
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub view: View,
    pub stopwatch: StopwatchSnapshot,
    pub timer: TimerSnapshot,
    pub pomodoro: PomodoroSnapshot,
    pub analytics: AnalyticsSnapshot,
    pub preferences: PreferencesSnapshot,
    pub voice_available: bool,
}

impl From<&Stopwatch> for StopwatchSnapshot {
    fn from(sw: &Stopwatch) -> Self {
        Self {
            state: sw.state(),
            elapsed_ms: sw.elapsed_ms(),
            display: sw.display(),
            laps: sw.ledger().newest_first().cloned().collect(),
        }
    }
}

impl From<&Countdown> for TimerSnapshot {
    fn from(c: &Countdown) -> Self {
        Self {
            state: c.state(),
            remaining_ms: c.remaining_ms(),
            total_ms: c.total_ms(),
            display: c.display(),
            progress: c.progress(),
            inputs: c.inputs(),
            inputs_locked: c.inputs_locked(),
            expired_notice: c.expired_notice(),
            loop_enabled: c.loop_enabled(),
        }
    }
}

impl From<&Pomodoro> for PomodoroSnapshot {
    fn from(p: &Pomodoro) -> Self {
        let counters = p.counters();
        Self {
            state: p.state(),
            phase: p.phase(),
            phase_label: p.phase().label().to_string(),
            remaining_secs: p.remaining_secs(),
            display: p.display(),
            progress: p.progress(),
            durations: p.durations(),
            sessions_completed: counters.sessions_completed,
            breaks_taken: counters.breaks_taken,
        }
    }
}

impl From<&LapAnalytics> for AnalyticsSnapshot {
    fn from(a: &LapAnalytics) -> Self {
        Self {
            summary: a.summary(),
            chart: a.series.clone(),
        }
    }
}

impl From<&Settings> for PreferencesSnapshot {
    fn from(s: &Settings) -> Self {
        Self {
            dark_mode: s.dark_mode,
            theme: s.theme,
            alarm_volume: s.alarm_volume,
            timer_loop: s.timer_loop,
        }
    }
}

impl Snapshot {
    pub fn capture(
        view: View,
        stopwatch: &Stopwatch,
        countdown: &Countdown,
        pomodoro: &Pomodoro,
        settings: &Settings,
        voice_available: bool,
    ) -> Self {
        Self {
            view,
            stopwatch: stopwatch.into(),
            timer: countdown.into(),
            pomodoro: pomodoro.into(),
            analytics: (&LapAnalytics::from_ledger(stopwatch.ledger())).into(),
            preferences: settings.into(),
            voice_available,
        }
    }

    /// The main readout of the active view, `None` on the analytics view.
    pub fn active_display(&self) -> Option<&str> {
        match self.view {
            View::Stopwatch => Some(self.stopwatch.display.as_str()),
            View::Timer => Some(self.timer.display.as_str()),
            View::Pomodoro => Some(self.pomodoro.display.as_str()),
            View::Analytics => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::CycleCounters;

    #[test]
    fn capture_reflects_every_engine() {
        let mut sw = Stopwatch::new();
        sw.start(0);
        sw.record_lap(2_000);
        sw.record_lap(5_000);
        let countdown = Countdown::default();
        let pomodoro = Pomodoro::new(PhaseDurations::default(), CycleCounters::default());

        let snap = Snapshot::capture(
            View::Stopwatch,
            &sw,
            &countdown,
            &pomodoro,
            &Settings::default(),
            true,
        );
        assert_eq!(snap.stopwatch.laps[0].number, Some(2));
        assert_eq!(snap.timer.display, "00:00:00.00");
        assert_eq!(snap.timer.progress, 1.0);
        assert_eq!(snap.pomodoro.display, "25:00");
        assert_eq!(snap.pomodoro.phase_label, "Work Session");
        assert_eq!(snap.analytics.chart.len(), 2);
        assert_eq!(snap.active_display(), Some("00:00:05.00"));
    }

    #[test]
    fn analytics_view_has_no_main_readout() {
        let snap = Snapshot::capture(
            View::Analytics,
            &Stopwatch::new(),
            &Countdown::default(),
            &Pomodoro::new(PhaseDurations::default(), CycleCounters::default()),
            &Settings::default(),
            false,
        );
        assert!(snap.active_display().is_none());
        assert_eq!(snap.analytics.summary.prediction, "--:--");
    }
}
