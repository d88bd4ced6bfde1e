//! Widget construction shared by the subcommands.

use timemaster_core::{
    AudioPlayer, Config, Database, SettingsStore, Silent, SystemClock, TerminalBell, Widget,
};

pub type Session = Widget<Database>;

/// Open the data-dir database and build a widget over it.
pub fn open(config: &Config) -> Result<Session, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let audio: Box<dyn AudioPlayer> = if config.audio.bell {
        Box::new(TerminalBell::default())
    } else {
        Box::new(Silent)
    };
    Ok(Widget::new(
        SettingsStore::new(db),
        config.engine,
        Box::new(SystemClock),
        audio,
    ))
}

/// One compact JSON object per line.
pub fn print_events(events: &[timemaster_core::Event]) -> Result<(), serde_json::Error> {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}
