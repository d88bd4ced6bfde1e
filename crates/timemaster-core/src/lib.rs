//! # TimeMaster Core Library
//!
//! The timing kernel behind the TimeMaster widget: a stopwatch with laps and
//! splits, a countdown timer, and a pomodoro cycle, routed through a single
//! active view. Everything is available from the standalone CLI binary; any
//! graphical front end is a thin layer over the same [`Widget`].
//!
//! ## Architecture
//!
//! - **Engines**: three independent state machines in [`timer`]. The caller
//!   drives them with `tick()` through the [`scheduler`]; none of them read
//!   the clock on their own.
//! - **Router**: keyboard keys and voice transcripts map to one [`Command`]
//!   enum, gated by the active [`View`].
//! - **Laps**: the ledger, its analytics and CSV export.
//! - **Storage**: SQLite key-value settings and TOML configuration.
//!
//! ## Key Components
//!
//! - [`Widget`]: owns the engines and turns commands into [`Event`]s
//! - [`Snapshot`]: serializable state for rendering
//! - [`Database`]: persistent key-value store
//! - [`Config`]: application configuration management

pub mod audio;
pub mod clock;
pub mod error;
pub mod events;
pub mod format;
pub mod laps;
pub mod router;
pub mod scheduler;
pub mod snapshot;
pub mod storage;
pub mod timer;
pub mod widget;

pub use audio::{AudioPlayer, Silent, TerminalBell};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AudioError, ConfigError, CoreError, DatabaseError, ExportError};
pub use events::Event;
pub use laps::{AnalyticsSummary, LapAnalytics, LapEntry, LapKind, LapLedger};
pub use router::{Command, Key, View, VoiceRouter};
pub use scheduler::{Task, TaskHandle, TickScheduler};
pub use snapshot::Snapshot;
pub use storage::{Config, Database, EngineTiming, KeyValueStore, MemoryStore, Settings, SettingsStore, Theme};
pub use timer::{Countdown, DurationInputs, EngineKind, Phase, Pomodoro, Stopwatch};
pub use widget::Widget;
