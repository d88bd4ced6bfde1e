use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod session;

#[derive(Parser)]
#[command(name = "timemaster", version, about = "TimeMaster stopwatch, timer and pomodoro")]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session driven by stdin lines
    Run {
        /// View to open on
        #[arg(long, default_value = "stopwatch")]
        view: timemaster_core::View,
    },
    /// Stopwatch control
    Stopwatch {
        #[command(subcommand)]
        action: commands::stopwatch::StopwatchAction,
    },
    /// Lap ledger
    Laps {
        #[command(subcommand)]
        action: commands::laps::LapsAction,
    },
    /// Lap analytics and pomodoro counters
    Stats,
    /// User preferences
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Format a millisecond count the way the widget displays it
    Format(commands::format::FormatArgs),
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = timemaster_core::Config::load_or_default();
    logging::init(&config.log.filter);

    let result = match cli.command {
        Commands::Run { view } => commands::run::run(&config, view),
        Commands::Stopwatch { action } => commands::stopwatch::run(&config, action),
        Commands::Laps { action } => commands::laps::run(&config, action),
        Commands::Stats => commands::stats::run(&config),
        Commands::Prefs { action } => commands::prefs::run(&config, action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Format(args) => commands::format::run(args),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
