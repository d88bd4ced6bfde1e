//! Countdown timer engine.
//!
//! Unlike the stopwatch, the countdown subtracts a fixed nominal step on every
//! tick. Late callbacks are not caught up, so over long runs it drifts behind
//! the wall clock.
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!         Expired -> Running (restart from inputs)
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::EngineKind;
use crate::events::Event;
use crate::format::format_time;

/// Default tick period.
pub const DEFAULT_STEP_MS: u64 = 10;

pub const MAX_HOURS: u8 = 23;
pub const MAX_MINUTES: u8 = 59;
pub const MAX_SECONDS: u8 = 59;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Idle,
    Running,
    Paused,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputField {
    Hours,
    Minutes,
    Seconds,
}

/// The three duration fields. Values are always within range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DurationInputs {
    hours: u8,
    minutes: u8,
    seconds: u8,
}

impl DurationInputs {
    /// Build from raw values, clamping each into range.
    pub fn new(hours: i64, minutes: i64, seconds: i64) -> Self {
        Self {
            hours: clamp_field(hours, MAX_HOURS),
            minutes: clamp_field(minutes, MAX_MINUTES),
            seconds: clamp_field(seconds, MAX_SECONDS),
        }
    }

    /// Decompose a preset length. Anything past 23:59:59 saturates.
    pub fn from_total_seconds(total: u64) -> Self {
        let hours = total / 3600;
        if hours > MAX_HOURS as u64 {
            return Self::new(MAX_HOURS as i64, MAX_MINUTES as i64, MAX_SECONDS as i64);
        }
        Self::new(hours as i64, ((total % 3600) / 60) as i64, (total % 60) as i64)
    }

    pub fn hours(&self) -> u8 {
        self.hours
    }

    pub fn minutes(&self) -> u8 {
        self.minutes
    }

    pub fn seconds(&self) -> u8 {
        self.seconds
    }

    pub fn set(&mut self, field: InputField, value: i64) {
        match field {
            InputField::Hours => self.hours = clamp_field(value, MAX_HOURS),
            InputField::Minutes => self.minutes = clamp_field(value, MAX_MINUTES),
            InputField::Seconds => self.seconds = clamp_field(value, MAX_SECONDS),
        }
    }

    /// Set a field from user text. Malformed text counts as 0.
    pub fn set_text(&mut self, field: InputField, text: &str) {
        self.set(field, parse_field(text));
    }

    pub fn total_ms(&self) -> u64 {
        (self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64) * 1000
    }
}

fn clamp_field(value: i64, max: u8) -> u8 {
    value.clamp(0, max as i64) as u8
}

/// Lenient integer parse: optional sign and leading digits, the rest ignored.
/// `"12abc"` is 12, `"abc"` is 0.
pub fn parse_field(text: &str) -> i64 {
    let text = text.trim();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<i64>()
        // Overlong digit runs saturate rather than fall back to 0.
        .or_else(|_| if end > 0 { Ok(i64::MAX) } else { Err(()) })
        .map(|v| v.saturating_mul(sign))
        .unwrap_or(0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    state: CountdownState,
    inputs: DurationInputs,
    remaining_ms: u64,
    total_ms: u64,
    step_ms: u64,
    inputs_locked: bool,
    /// End-of-timer message; shown from expiry until reset.
    expired_notice: bool,
    loop_enabled: bool,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_MS)
    }
}

impl Countdown {
    pub fn new(step_ms: u64) -> Self {
        Self {
            state: CountdownState::Idle,
            inputs: DurationInputs::default(),
            remaining_ms: 0,
            total_ms: 0,
            step_ms: step_ms.max(1),
            inputs_locked: false,
            expired_notice: false,
            loop_enabled: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ms
    }

    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    pub fn inputs(&self) -> DurationInputs {
        self.inputs
    }

    pub fn inputs_locked(&self) -> bool {
        self.inputs_locked
    }

    pub fn expired_notice(&self) -> bool {
        self.expired_notice
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    /// `remaining / total`, 1.0 before any run.
    pub fn progress(&self) -> f64 {
        if self.total_ms == 0 {
            return 1.0;
        }
        self.remaining_ms as f64 / self.total_ms as f64
    }

    pub fn display(&self) -> String {
        format_time(self.remaining_ms)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Resume, or begin a new run from the inputs when nothing remains.
    /// A zero-length input is rejected.
    pub fn start(&mut self) -> Option<Event> {
        if self.is_running() {
            return None;
        }
        if self.remaining_ms == 0 {
            let total = self.inputs.total_ms();
            if total == 0 {
                return None;
            }
            self.total_ms = total;
            self.remaining_ms = total;
        }
        self.state = CountdownState::Running;
        self.inputs_locked = true;
        tracing::debug!(remaining_ms = self.remaining_ms, "countdown started");
        Some(Event::EngineStarted {
            engine: EngineKind::Timer,
            value_ms: self.remaining_ms,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.state = CountdownState::Paused;
        tracing::debug!(remaining_ms = self.remaining_ms, "countdown paused");
        Some(Event::EnginePaused {
            engine: EngineKind::Timer,
            value_ms: self.remaining_ms,
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

    pub fn reset(&mut self) -> Option<Event> {
        self.state = CountdownState::Idle;
        self.remaining_ms = 0;
        self.total_ms = 0;
        self.inputs_locked = false;
        self.expired_notice = false;
        Some(Event::EngineReset {
            engine: EngineKind::Timer,
            at: Utc::now(),
        })
    }

    /// Subtract one step. Returns `TimerExpired` on the tick that reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_running() || self.remaining_ms == 0 {
            return None;
        }
        self.remaining_ms = self.remaining_ms.saturating_sub(self.step_ms);
        if self.remaining_ms > 0 {
            return None;
        }
        self.state = CountdownState::Expired;
        self.expired_notice = true;
        tracing::info!(total_ms = self.total_ms, "countdown expired");
        Some(Event::TimerExpired {
            total_ms: self.total_ms,
            looping: self.loop_enabled,
            at: Utc::now(),
        })
    }

    /// Fill the inputs from a preset length. Rejected while running.
    pub fn set_preset(&mut self, total_seconds: u64) -> bool {
        if self.is_running() {
            return false;
        }
        self.inputs = DurationInputs::from_total_seconds(total_seconds);
        true
    }

    /// Edit one field from user text. Rejected while the inputs are locked.
    pub fn set_field_text(&mut self, field: InputField, text: &str) -> bool {
        if self.inputs_locked {
            return false;
        }
        self.inputs.set_text(field, text);
        true
    }

    /// Replace all three fields. Rejected while the inputs are locked.
    pub fn set_inputs(&mut self, inputs: DurationInputs) -> bool {
        if self.inputs_locked {
            return false;
        }
        self.inputs = inputs;
        true
    }

    pub fn set_loop(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }
}
