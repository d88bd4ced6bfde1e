use clap::Subcommand;
use timemaster_core::{Command, Config, EngineKind};

use crate::session::{self, print_events};

#[derive(Subcommand)]
pub enum StopwatchAction {
    /// Start or resume counting
    Start,
    /// Pause, keeping the elapsed time
    Pause,
    /// Stop, zero and clear the laps
    Reset,
    /// Record a lap (running only)
    Lap,
    /// Record a split (running only)
    Split,
    /// Print the stopwatch state as JSON
    Status,
}

pub fn run(config: &Config, action: StopwatchAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut widget = session::open(config)?;

    let command = match action {
        StopwatchAction::Start => Command::Start(EngineKind::Stopwatch),
        StopwatchAction::Pause => Command::Pause(EngineKind::Stopwatch),
        StopwatchAction::Reset => Command::Reset(EngineKind::Stopwatch),
        StopwatchAction::Lap => Command::RecordLap,
        StopwatchAction::Split => Command::RecordSplit,
        StopwatchAction::Status => {
            let snapshot = widget.snapshot();
            println!("{}", serde_json::to_string_pretty(&snapshot.stopwatch)?);
            return Ok(());
        }
    };

    let events = widget.dispatch(command);
    if events.is_empty() {
        eprintln!("nothing to do: stopwatch is {:?}", widget.stopwatch().state());
    }
    print_events(&events)?;
    widget.save_session()?;
    Ok(())
}
