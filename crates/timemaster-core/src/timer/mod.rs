mod countdown;
mod pomodoro;
mod stopwatch;

use serde::{Deserialize, Serialize};

pub use countdown::{
    parse_field, Countdown, CountdownState, DurationInputs, InputField, DEFAULT_STEP_MS,
    MAX_HOURS, MAX_MINUTES, MAX_SECONDS,
};
pub use pomodoro::{
    CycleCounters, Phase, PhaseDurations, Pomodoro, PomodoroState, SESSIONS_PER_LONG_BREAK,
};
pub use stopwatch::{Stopwatch, StopwatchState};

/// The three independent timing engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Stopwatch,
    Timer,
    Pomodoro,
}
