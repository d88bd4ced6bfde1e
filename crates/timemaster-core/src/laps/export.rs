//! CSV export of the lap ledger.

use std::path::{Path, PathBuf};

use super::ledger::{LapKind, LapLedger};
use crate::error::ExportError;

pub const EXPORT_FILE_NAME: &str = "timemaster_laps.csv";

const CSV_HEADER: &str = "Type,Number,Time";

/// Render the ledger as CSV, chronological. `None` for an empty ledger.
pub fn render_csv(ledger: &LapLedger) -> Option<String> {
    if ledger.is_empty() {
        return None;
    }

    let mut csv = String::from(CSV_HEADER);
    csv.push('\n');
    for entry in ledger.entries() {
        let number = match entry.kind {
            LapKind::Lap => entry.number.map(|n| n.to_string()).unwrap_or_default(),
            LapKind::Split => String::new(),
        };
        csv.push_str(&format!("{},{},{}\n", entry.kind.as_str(), number, entry.display));
    }
    Some(csv)
}

/// Write [`EXPORT_FILE_NAME`] into `dir`.
///
/// Returns `Ok(None)` without touching the filesystem when the ledger is empty.
pub fn export_csv(ledger: &LapLedger, dir: &Path) -> Result<Option<PathBuf>, ExportError> {
    let Some(csv) = render_csv(ledger) else {
        return Ok(None);
    };
    if !dir.is_dir() {
        return Err(ExportError::NotADirectory(dir.to_path_buf()));
    }

    let path = dir.join(EXPORT_FILE_NAME);
    std::fs::write(&path, csv).map_err(|source| ExportError::WriteFailed {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), entries = ledger.len(), "exported laps");
    Ok(Some(path))
}
