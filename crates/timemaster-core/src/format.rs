//! Display formatting shared by every engine and by analytics.
//!
//! All durations are rendered from one decomposition, [`TimeParts`]:
//! centiseconds are `floor(ms % 1000 / 10)`, hours are unbounded and padded to
//! at least two digits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A millisecond count broken into display fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeParts {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub centis: u64,
}

impl TimeParts {
    pub fn from_ms(ms: u64) -> Self {
        let total_secs = ms / 1000;
        Self {
            hours: total_secs / 3600,
            minutes: (total_secs % 3600) / 60,
            seconds: total_secs % 60,
            centis: (ms % 1000) / 10,
        }
    }
}

impl fmt::Display for TimeParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:02}",
            self.hours, self.minutes, self.seconds, self.centis
        )
    }
}

/// `HH:MM:SS.CC`
pub fn format_time(ms: u64) -> String {
    TimeParts::from_ms(ms).to_string()
}

/// `HH:MM:SS`, used for the total-tracked figure.
pub fn format_clock(ms: u64) -> String {
    let p = TimeParts::from_ms(ms);
    format!("{:02}:{:02}:{:02}", p.hours, p.minutes, p.seconds)
}

/// Compact lap figure: `MM:SS.CC` below one hour, `HH:MM:SS.CC` above.
pub fn format_lap(ms: u64) -> String {
    let p = TimeParts::from_ms(ms);
    if p.hours == 0 {
        format!("{:02}:{:02}.{:02}", p.minutes, p.seconds, p.centis)
    } else {
        p.to_string()
    }
}

/// Pomodoro display, `MM:SS` from whole seconds. Minutes are not wrapped into hours.
pub fn format_pomodoro(remaining_secs: u64) -> String {
    format!("{:02}:{:02}", remaining_secs / 60, remaining_secs % 60)
}
