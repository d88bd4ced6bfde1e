use clap::Subcommand;
use timemaster_core::{Config, Theme};

use crate::session;

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Print every preference as JSON
    Show,
    /// Set dark mode, or toggle it when no value is given
    DarkMode { enabled: Option<bool> },
    /// Colour theme: default, ocean, forest or sunset
    Theme { name: String },
    /// Alarm volume, clamped to 0..=100
    Volume {
        #[arg(allow_negative_numbers = true)]
        volume: i64,
    },
    /// Restart the timer automatically after it expires
    Loop {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Pomodoro phase lengths in minutes, each clamped to 1..=180
    Pomodoro {
        #[arg(allow_negative_numbers = true)]
        work: i64,
        #[arg(allow_negative_numbers = true)]
        short_break: i64,
        #[arg(allow_negative_numbers = true)]
        long_break: i64,
    },
}

pub fn run(config: &Config, action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut widget = session::open(config)?;

    match action {
        PrefsAction::Show => {}
        PrefsAction::DarkMode { enabled: Some(enabled) } => widget.set_dark_mode(enabled)?,
        PrefsAction::DarkMode { enabled: None } => {
            widget.toggle_dark_mode()?;
        }
        PrefsAction::Theme { name } => {
            let theme = name.parse::<Theme>().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "falling back to the default theme");
                Theme::Default
            });
            widget.set_theme(theme)?;
        }
        PrefsAction::Volume { volume } => widget.set_alarm_volume(volume)?,
        PrefsAction::Loop { enabled } => widget.set_timer_loop(enabled)?,
        PrefsAction::Pomodoro {
            work,
            short_break,
            long_break,
        } => widget.set_pomodoro_minutes(work, short_break, long_break)?,
    }

    let settings = widget.settings();
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}
