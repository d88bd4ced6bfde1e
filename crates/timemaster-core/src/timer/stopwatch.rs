//! Stopwatch engine.
//!
//! Wall-clock based: while running, elapsed time is always recomputed as
//! `now - reference`, where the reference is the start instant shifted back by
//! whatever had accumulated before. Redraw callbacks can arrive late or not at
//! all without losing or double-counting time.
//!
//! ```text
//! Stopped -> Running <-> Paused
//!    ^__________reset_______|
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::EngineKind;
use crate::events::Event;
use crate::format::format_time;
use crate::laps::{LapEntry, LapKind, LapLedger};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopwatchState {
    Stopped,
    Running,
    Paused,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stopwatch {
    state: StopwatchState,
    /// `now - elapsed` at the last start. Only set while running.
    #[serde(default)]
    reference_ms: Option<u64>,
    elapsed_ms: u64,
    #[serde(default)]
    ledger: LapLedger,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            state: StopwatchState::Stopped,
            reference_ms: None,
            elapsed_ms: 0,
            ledger: LapLedger::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> StopwatchState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == StopwatchState::Running
    }

    /// Elapsed time as of the last start/pause/tick.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn display(&self) -> String {
        format_time(self.elapsed_ms)
    }

    pub fn ledger(&self) -> &LapLedger {
        &self.ledger
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, now_ms: u64) -> Option<Event> {
        if self.is_running() {
            return None;
        }
        self.reference_ms = Some(now_ms.saturating_sub(self.elapsed_ms));
        self.state = StopwatchState::Running;
        tracing::debug!(elapsed_ms = self.elapsed_ms, "stopwatch started");
        Some(Event::EngineStarted {
            engine: EngineKind::Stopwatch,
            value_ms: self.elapsed_ms,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self, now_ms: u64) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.tick(now_ms);
        self.reference_ms = None;
        self.state = StopwatchState::Paused;
        tracing::debug!(elapsed_ms = self.elapsed_ms, "stopwatch paused");
        Some(Event::EnginePaused {
            engine: EngineKind::Stopwatch,
            value_ms: self.elapsed_ms,
            at: Utc::now(),
        })
    }

    pub fn toggle(&mut self, now_ms: u64) -> Option<Event> {
        if self.is_running() {
            self.pause(now_ms)
        } else {
            self.start(now_ms)
        }
    }

    /// Stop, zero the elapsed time and clear the ledger. Always succeeds.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = StopwatchState::Stopped;
        self.reference_ms = None;
        self.elapsed_ms = 0;
        self.ledger.clear();
        Some(Event::EngineReset {
            engine: EngineKind::Stopwatch,
            at: Utc::now(),
        })
    }

    /// Recompute elapsed from the wall clock. Does nothing unless running.
    pub fn tick(&mut self, now_ms: u64) {
        if let (StopwatchState::Running, Some(reference)) = (self.state, self.reference_ms) {
            // Never let a late redraw move the display backwards.
            self.elapsed_ms = self.elapsed_ms.max(now_ms.saturating_sub(reference));
        }
    }

    pub fn record_lap(&mut self, now_ms: u64) -> Option<Event> {
        self.record(LapKind::Lap, now_ms)
    }

    pub fn record_split(&mut self, now_ms: u64) -> Option<Event> {
        self.record(LapKind::Split, now_ms)
    }

    /// Empty the ledger without touching the elapsed time.
    pub fn clear_laps(&mut self) -> Option<Event> {
        self.ledger.clear();
        Some(Event::LapsCleared { at: Utc::now() })
    }

    fn record(&mut self, kind: LapKind, now_ms: u64) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.tick(now_ms);
        let LapEntry {
            number,
            timestamp_ms,
            display,
            ..
        } = match kind {
            LapKind::Lap => self.ledger.record_lap(self.elapsed_ms),
            LapKind::Split => self.ledger.record_split(self.elapsed_ms),
        }
        .clone();
        Some(Event::LapRecorded {
            kind,
            number,
            timestamp_ms,
            display,
            at: Utc::now(),
        })
    }
}
