use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::timer::{DurationInputs, EngineKind, InputField};

/// The screen currently in front of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Stopwatch,
    Timer,
    Pomodoro,
    Analytics,
}

impl View {
    /// Engine shown on this view, if any.
    pub fn engine(self) -> Option<EngineKind> {
        match self {
            View::Stopwatch => Some(EngineKind::Stopwatch),
            View::Timer => Some(EngineKind::Timer),
            View::Pomodoro => Some(EngineKind::Pomodoro),
            View::Analytics => None,
        }
    }

    pub fn for_engine(engine: EngineKind) -> Self {
        match engine {
            EngineKind::Stopwatch => View::Stopwatch,
            EngineKind::Timer => View::Timer,
            EngineKind::Pomodoro => View::Pomodoro,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            View::Stopwatch => "stopwatch",
            View::Timer => "timer",
            View::Pomodoro => "pomodoro",
            View::Analytics => "analytics",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stopwatch" => Ok(View::Stopwatch),
            "timer" => Ok(View::Timer),
            "pomodoro" => Ok(View::Pomodoro),
            "analytics" | "statistics" => Ok(View::Analytics),
            other => Err(format!("unknown view: {other}")),
        }
    }
}

/// Everything a trigger can ask the widget to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Start(EngineKind),
    Pause(EngineKind),
    Toggle(EngineKind),
    Reset(EngineKind),
    RecordLap,
    RecordSplit,
    ClearLaps,
    Skip,
    SwitchView(View),
    /// Start an engine after the view-switch delay.
    DeferredStart(EngineKind),
    SetTimerPreset(u64),
    SetTimerInputs(DurationInputs),
    SetTimerField(InputField, String),
}
