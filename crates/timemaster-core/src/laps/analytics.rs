//! Summary statistics over the lap ledger.
//!
//! Splits count toward the total tracked time but are excluded from every
//! per-lap figure.

use serde::{Deserialize, Serialize};

use super::ledger::LapLedger;
use crate::format::{format_clock, format_lap};

/// Number of most recent laps averaged for the next-lap prediction.
pub const PREDICTION_WINDOW: usize = 3;

const PREDICTION_PLACEHOLDER: &str = "--:--";

/// One point of the lap-duration chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub seconds: f64,
}

/// Raw analytics figures, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LapAnalytics {
    /// Sum of every entry's timestamp, laps and splits.
    pub total_tracked_ms: u64,
    pub lap_count: usize,
    pub average_lap_ms: Option<u64>,
    pub fastest_lap_ms: Option<u64>,
    /// Mean of the last [`PREDICTION_WINDOW`] laps; `None` with fewer laps.
    pub predicted_next_ms: Option<u64>,
    /// Lap durations in recording order.
    pub series: Vec<ChartPoint>,
}

/// Analytics rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub total_tracked: String,
    pub average_lap: String,
    pub fastest_lap: String,
    pub lap_count: usize,
    pub prediction: String,
}

impl LapAnalytics {
    pub fn from_ledger(ledger: &LapLedger) -> Self {
        let total_tracked_ms = ledger.entries().iter().map(|e| e.timestamp_ms).sum();
        let lap_times: Vec<u64> = ledger.laps().map(|e| e.timestamp_ms).collect();

        let average_lap_ms = mean(&lap_times);
        let fastest_lap_ms = lap_times.iter().copied().min();
        let predicted_next_ms = if lap_times.len() >= PREDICTION_WINDOW {
            mean(&lap_times[lap_times.len() - PREDICTION_WINDOW..])
        } else {
            None
        };

        let series = lap_times
            .iter()
            .enumerate()
            .map(|(i, ms)| ChartPoint {
                label: format!("Lap {}", i + 1),
                seconds: *ms as f64 / 1000.0,
            })
            .collect();

        Self {
            total_tracked_ms,
            lap_count: lap_times.len(),
            average_lap_ms,
            fastest_lap_ms,
            predicted_next_ms,
            series,
        }
    }

    pub fn summary(&self) -> AnalyticsSummary {
        AnalyticsSummary {
            total_tracked: format_clock(self.total_tracked_ms),
            average_lap: format_lap(self.average_lap_ms.unwrap_or(0)),
            fastest_lap: format_lap(self.fastest_lap_ms.unwrap_or(0)),
            lap_count: self.lap_count,
            prediction: self
                .predicted_next_ms
                .map(format_lap)
                .unwrap_or_else(|| PREDICTION_PLACEHOLDER.to_string()),
        }
    }
}

fn mean(values: &[u64]) -> Option<u64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<u64>() / values.len() as u64)
}
