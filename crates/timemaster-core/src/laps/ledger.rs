use serde::{Deserialize, Serialize};

use crate::format::format_time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LapKind {
    Lap,
    Split,
}

impl LapKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LapKind::Lap => "lap",
            LapKind::Split => "split",
        }
    }
}

/// One recorded stopwatch reading. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LapEntry {
    pub kind: LapKind,
    /// Sequence number, laps only. Starts at 1.
    pub number: Option<u32>,
    /// Stopwatch elapsed time at the moment of recording.
    pub timestamp_ms: u64,
    /// `HH:MM:SS.CC` rendering of `timestamp_ms`.
    pub display: String,
}

impl LapEntry {
    /// Label shown in the lap list: `Lap N` or `Split`.
    pub fn label(&self) -> String {
        match (self.kind, self.number) {
            (LapKind::Lap, Some(n)) => format!("Lap {n}"),
            (LapKind::Lap, None) => "Lap".to_string(),
            (LapKind::Split, _) => "Split".to_string(),
        }
    }
}

/// Ordered append log of laps and splits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LapLedger {
    entries: Vec<LapEntry>,
    next_lap_number: u32,
}

impl Default for LapLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LapLedger {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_lap_number: 1,
        }
    }

    /// Append a lap, consuming the next sequence number.
    pub fn record_lap(&mut self, timestamp_ms: u64) -> &LapEntry {
        let number = self.next_lap_number;
        self.next_lap_number += 1;
        self.push(LapKind::Lap, Some(number), timestamp_ms)
    }

    /// Append a split. Splits do not consume a sequence number.
    pub fn record_split(&mut self, timestamp_ms: u64) -> &LapEntry {
        self.push(LapKind::Split, None, timestamp_ms)
    }

    fn push(&mut self, kind: LapKind, number: Option<u32>, timestamp_ms: u64) -> &LapEntry {
        self.entries.push(LapEntry {
            kind,
            number,
            timestamp_ms,
            display: format_time(timestamp_ms),
        });
        // Just pushed, so never empty.
        &self.entries[self.entries.len() - 1]
    }

    /// Drop every entry and restart lap numbering at 1.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_lap_number = 1;
    }

    /// Chronological (append) order.
    pub fn entries(&self) -> &[LapEntry] {
        &self.entries
    }

    /// Most recent first, the order the lap list is displayed in.
    pub fn newest_first(&self) -> impl Iterator<Item = &LapEntry> {
        self.entries.iter().rev()
    }

    /// Lap-kind entries only, chronological.
    pub fn laps(&self) -> impl Iterator<Item = &LapEntry> {
        self.entries.iter().filter(|e| e.kind == LapKind::Lap)
    }

    pub fn next_lap_number(&self) -> u32 {
        self.next_lap_number
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
