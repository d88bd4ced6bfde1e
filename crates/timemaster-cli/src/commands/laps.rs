use std::path::PathBuf;

use clap::Subcommand;
use timemaster_core::{Command, Config};

use crate::session::{self, print_events};

#[derive(Subcommand)]
pub enum LapsAction {
    /// List laps and splits, newest first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Remove every lap and split
    Clear,
    /// Write timemaster_laps.csv
    Export {
        /// Target directory (defaults to the current directory)
        dir: Option<PathBuf>,
    },
}

pub fn run(config: &Config, action: LapsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut widget = session::open(config)?;

    match action {
        LapsAction::List { json } => {
            let laps = widget.snapshot().stopwatch.laps;
            if json {
                println!("{}", serde_json::to_string_pretty(&laps)?);
            } else if laps.is_empty() {
                println!("no laps recorded");
            } else {
                for entry in &laps {
                    println!("{:<8} {}", entry.label(), entry.display);
                }
            }
        }
        LapsAction::Clear => {
            print_events(&widget.dispatch(Command::ClearLaps))?;
            widget.save_session()?;
        }
        LapsAction::Export { dir } => {
            let dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            match widget.export_laps(&dir)? {
                Some(path) => println!("{}", path.display()),
                None => eprintln!("no laps to export"),
            }
        }
    }
    Ok(())
}
