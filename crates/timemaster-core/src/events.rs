use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::laps::LapKind;
use crate::router::View;
use crate::timer::{EngineKind, Phase};

/// Every state change in the system produces an Event.
/// The render layer consumes them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    EngineStarted {
        engine: EngineKind,
        /// Elapsed time for the stopwatch, remaining time otherwise.
        value_ms: u64,
        at: DateTime<Utc>,
    },
    EnginePaused {
        engine: EngineKind,
        value_ms: u64,
        at: DateTime<Utc>,
    },
    EngineReset {
        engine: EngineKind,
        at: DateTime<Utc>,
    },
    /// A lap or split was appended to the ledger.
    LapRecorded {
        kind: LapKind,
        number: Option<u32>,
        timestamp_ms: u64,
        display: String,
        at: DateTime<Utc>,
    },
    LapsCleared {
        at: DateTime<Utc>,
    },
    /// Countdown reached zero.
    TimerExpired {
        total_ms: u64,
        /// A restart has been scheduled.
        looping: bool,
        at: DateTime<Utc>,
    },
    /// Pomodoro moved to its next phase, on expiry or skip.
    PhaseAdvanced {
        from: Phase,
        to: Phase,
        sessions_completed: u64,
        breaks_taken: u64,
        skipped: bool,
        at: DateTime<Utc>,
    },
    ViewSwitched {
        from: View,
        to: View,
        at: DateTime<Utc>,
    },
    /// The alarm collaborator was asked to play.
    AlarmRequested {
        volume: u8,
        at: DateTime<Utc>,
    },
    /// End-of-countdown celebration for the render layer.
    Celebrate {
        engine: EngineKind,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::EngineStarted { at, .. }
            | Event::EnginePaused { at, .. }
            | Event::EngineReset { at, .. }
            | Event::LapRecorded { at, .. }
            | Event::LapsCleared { at }
            | Event::TimerExpired { at, .. }
            | Event::PhaseAdvanced { at, .. }
            | Event::ViewSwitched { at, .. }
            | Event::AlarmRequested { at, .. }
            | Event::Celebrate { at, .. } => *at,
        }
    }
}
