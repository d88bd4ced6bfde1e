//! Lap ledger and the analytics derived from it.
//!
//! The stopwatch is the only producer. The ledger is append-only with a
//! clear-all; analytics are recomputed from scratch on every request.

mod analytics;
mod export;
mod ledger;

pub use analytics::{AnalyticsSummary, ChartPoint, LapAnalytics, PREDICTION_WINDOW};
pub use export::{export_csv, render_csv, EXPORT_FILE_NAME};
pub use ledger::{LapEntry, LapKind, LapLedger};
