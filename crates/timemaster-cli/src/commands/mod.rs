pub mod completions;
pub mod config;
pub mod format;
pub mod laps;
pub mod prefs;
pub mod run;
pub mod stats;
pub mod stopwatch;
