use serde_json::json;
use timemaster_core::Config;

use crate::session;

pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let widget = session::open(config)?;
    let snapshot = widget.snapshot();
    let out = json!({
        "laps": snapshot.analytics.summary,
        "chart": snapshot.analytics.chart,
        "pomodoro": {
            "sessions_completed": snapshot.pomodoro.sessions_completed,
            "breaks_taken": snapshot.pomodoro.breaks_taken,
        },
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
