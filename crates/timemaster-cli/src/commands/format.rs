use clap::{Args, ValueEnum};
use timemaster_core::format::{format_clock, format_lap, format_pomodoro, format_time};

#[derive(Clone, Copy, ValueEnum)]
pub enum Style {
    /// HH:MM:SS.CC
    Time,
    /// HH:MM:SS
    Clock,
    /// MM:SS.CC under an hour
    Lap,
    /// MM:SS from whole seconds
    Pomodoro,
}

#[derive(Args)]
pub struct FormatArgs {
    /// Milliseconds
    ms: u64,
    #[arg(long, value_enum, default_value = "time")]
    style: Style,
}

pub fn run(args: FormatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = match args.style {
        Style::Time => format_time(args.ms),
        Style::Clock => format_clock(args.ms),
        Style::Lap => format_lap(args.ms),
        Style::Pomodoro => format_pomodoro(args.ms / 1000),
    };
    println!("{text}");
    Ok(())
}
