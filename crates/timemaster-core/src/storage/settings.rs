//! Typed user preferences over the key-value store.
//!
//! Every value is stored as a string under one of the keys below. Loading
//! never fails: an absent or malformed value falls back to its default, and
//! a store error is logged and treated as absent.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::kv::KeyValueStore;
use crate::error::Result;
use crate::timer::{CycleCounters, PhaseDurations, Stopwatch};

const KEY_DARK_MODE: &str = "dark_mode";
const KEY_THEME: &str = "theme";
const KEY_TIMER_LOOP: &str = "timer_loop";
const KEY_ALARM_VOLUME: &str = "alarm_volume";
const KEY_WORK_MINUTES: &str = "pomodoro_work_minutes";
const KEY_BREAK_MINUTES: &str = "pomodoro_break_minutes";
const KEY_LONG_BREAK_MINUTES: &str = "pomodoro_long_break_minutes";
const KEY_SESSIONS_COMPLETED: &str = "sessions_completed";
const KEY_BREAKS_TAKEN: &str = "breaks_taken";
const KEY_STOPWATCH: &str = "stopwatch";

pub const MAX_ALARM_VOLUME: u8 = 100;
pub const MIN_PHASE_MINUTES: u32 = 1;
pub const MAX_PHASE_MINUTES: u32 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Default,
    Ocean,
    Forest,
    Sunset,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Default, Theme::Ocean, Theme::Forest, Theme::Sunset];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::Ocean => "ocean",
            Theme::Forest => "forest",
            Theme::Sunset => "sunset",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown theme: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub dark_mode: bool,
    pub theme: Theme,
    pub timer_loop: bool,
    /// Alarm volume, 0..=100.
    pub alarm_volume: u8,
    pub durations: PhaseDurations,
    pub counters: CycleCounters,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: false,
            theme: Theme::Default,
            timer_loop: false,
            alarm_volume: 50,
            durations: PhaseDurations::default(),
            counters: CycleCounters::default(),
        }
    }
}

impl Settings {
    /// Volume as the audio collaborator expects it, 0.0..=1.0.
    pub fn volume_fraction(&self) -> f32 {
        self.alarm_volume.min(MAX_ALARM_VOLUME) as f32 / MAX_ALARM_VOLUME as f32
    }

    pub fn set_alarm_volume(&mut self, volume: i64) {
        self.alarm_volume = volume.clamp(0, MAX_ALARM_VOLUME as i64) as u8;
    }

    /// Clamp each length into `MIN_PHASE_MINUTES..=MAX_PHASE_MINUTES`.
    pub fn set_durations(&mut self, work: i64, short_break: i64, long_break: i64) {
        self.durations = PhaseDurations {
            work_min: clamp_minutes(work),
            short_break_min: clamp_minutes(short_break),
            long_break_min: clamp_minutes(long_break),
        };
    }
}

fn clamp_minutes(value: i64) -> u32 {
    value.clamp(MIN_PHASE_MINUTES as i64, MAX_PHASE_MINUTES as i64) as u32
}

/// The one place settings cross into the key-value store.
pub struct SettingsStore<S: KeyValueStore> {
    kv: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    pub fn load(&self) -> Settings {
        let d = Settings::default();
        let durations = PhaseDurations {
            work_min: clamp_minutes(self.read(KEY_WORK_MINUTES, d.durations.work_min as i64)),
            short_break_min: clamp_minutes(
                self.read(KEY_BREAK_MINUTES, d.durations.short_break_min as i64),
            ),
            long_break_min: clamp_minutes(
                self.read(KEY_LONG_BREAK_MINUTES, d.durations.long_break_min as i64),
            ),
        };
        Settings {
            dark_mode: self.read(KEY_DARK_MODE, d.dark_mode),
            theme: self.read(KEY_THEME, d.theme),
            timer_loop: self.read(KEY_TIMER_LOOP, d.timer_loop),
            alarm_volume: self
                .read(KEY_ALARM_VOLUME, d.alarm_volume as i64)
                .clamp(0, MAX_ALARM_VOLUME as i64) as u8,
            durations,
            counters: CycleCounters {
                sessions_completed: self.read(KEY_SESSIONS_COMPLETED, 0u64),
                breaks_taken: self.read(KEY_BREAKS_TAKEN, 0u64),
            },
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        self.kv.set(KEY_DARK_MODE, &settings.dark_mode.to_string())?;
        self.kv.set(KEY_THEME, settings.theme.as_str())?;
        self.kv.set(KEY_TIMER_LOOP, &settings.timer_loop.to_string())?;
        self.kv.set(KEY_ALARM_VOLUME, &settings.alarm_volume.to_string())?;
        self.kv.set(KEY_WORK_MINUTES, &settings.durations.work_min.to_string())?;
        self.kv.set(KEY_BREAK_MINUTES, &settings.durations.short_break_min.to_string())?;
        self.kv.set(KEY_LONG_BREAK_MINUTES, &settings.durations.long_break_min.to_string())?;
        self.save_counters(settings.counters)
    }

    /// Persist only the pomodoro counters, after every phase advance.
    pub fn save_counters(&self, counters: CycleCounters) -> Result<()> {
        self.kv.set(KEY_SESSIONS_COMPLETED, &counters.sessions_completed.to_string())?;
        self.kv.set(KEY_BREAKS_TAKEN, &counters.breaks_taken.to_string())?;
        Ok(())
    }

    /// The stopwatch saved by the last session, laps included.
    pub fn load_stopwatch(&self) -> Option<Stopwatch> {
        let raw = match self.kv.get(KEY_STOPWATCH) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read saved stopwatch");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(stopwatch) => Some(stopwatch),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable saved stopwatch");
                None
            }
        }
    }

    pub fn save_stopwatch(&self, stopwatch: &Stopwatch) -> Result<()> {
        let json = serde_json::to_string(stopwatch)?;
        self.kv.set(KEY_STOPWATCH, &json)
    }

    fn read<T: FromStr>(&self, key: &str, default: T) -> T {
        match self.kv.get(key) {
            Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(key, value = %raw, "malformed setting, using default");
                default
            }),
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read setting, using default");
                default
            }
        }
    }
}
