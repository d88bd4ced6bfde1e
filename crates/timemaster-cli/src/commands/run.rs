//! Interactive session.
//!
//! Reads one instruction per stdin line while the widget's callbacks fire on
//! a tokio timer. Events and snapshots go to stdout as JSON lines.

use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use timemaster_core::timer::parse_field;
use timemaster_core::{Command, Config, DurationInputs, Key, View};

use crate::session::{self, print_events, Session};

/// One parsed stdin line.
#[derive(Debug, Clone, PartialEq)]
enum Line {
    Key(char),
    Say(String),
    View(View),
    Preset(u64),
    Set(DurationInputs),
    Export(Option<PathBuf>),
    Show,
    Quit,
    Empty,
    Unknown(String),
}

impl Line {
    fn parse(raw: &str) -> Self {
        let line = raw.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match word.to_ascii_lowercase().as_str() {
            "" => Line::Empty,
            "quit" | "exit" => Line::Quit,
            "show" => Line::Show,
            "space" => Line::Key(' '),
            "say" if !rest.is_empty() => Line::Say(rest.to_string()),
            "view" => rest
                .parse()
                .map(Line::View)
                .unwrap_or_else(|_| Line::Unknown(line.to_string())),
            "preset" => rest
                .parse()
                .map(Line::Preset)
                .unwrap_or_else(|_| Line::Unknown(line.to_string())),
            "set" => {
                let mut fields = rest.split_whitespace().map(parse_field);
                let mut next = || fields.next().unwrap_or(0);
                let (h, m, s) = (next(), next(), next());
                Line::Set(DurationInputs::new(h, m, s))
            }
            "export" => Line::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
            _ if rest.is_empty() && word.chars().count() == 1 => {
                Line::Key(word.chars().next().unwrap_or(' '))
            }
            _ => Line::Unknown(line.to_string()),
        }
    }
}

pub fn run(config: &Config, view: View) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let mut widget = session::open(config)?;
    print_events(&widget.dispatch(Command::SwitchView(view)))?;
    let result = runtime.block_on(drive(&mut widget));
    // The stdin reader may still be parked on a blocking read.
    runtime.shutdown_background();
    widget.save_session()?;
    result
}

async fn drive(widget: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let wait = widget
            .next_due()
            .map(|due| due.saturating_sub(widget.now_ms()));
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(widget, Line::parse(&line))? {
                    break;
                }
            }
            _ = sleep(wait) => {
                print_events(&widget.poll())?;
            }
        }
    }
    Ok(())
}

async fn sleep(ms: Option<u64>) {
    match ms {
        Some(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
        None => std::future::pending().await,
    }
}

/// Apply one line. Returns `false` when the session should end.
fn handle_line(widget: &mut Session, line: Line) -> Result<bool, Box<dyn std::error::Error>> {
    let events = match line {
        Line::Quit => return Ok(false),
        Line::Empty => return Ok(true),
        Line::Key(c) => widget.press_key(Key::new(c)),
        Line::Say(text) => widget.hear(&text),
        Line::View(view) => widget.dispatch(Command::SwitchView(view)),
        Line::Preset(secs) => widget.dispatch(Command::SetTimerPreset(secs)),
        Line::Set(inputs) => widget.dispatch(Command::SetTimerInputs(inputs)),
        Line::Export(dir) => {
            let dir = match dir {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            match widget.export_laps(&dir) {
                Ok(Some(path)) => eprintln!("exported {}", path.display()),
                Ok(None) => eprintln!("no laps to export"),
                Err(e) => eprintln!("error: {e}"),
            }
            Vec::new()
        }
        Line::Show => {
            println!("{}", serde_json::to_string(&widget.snapshot())?);
            Vec::new()
        }
        Line::Unknown(text) => {
            eprintln!("unrecognized input: {text}");
            Vec::new()
        }
    };
    print_events(&events)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_and_words() {
        assert_eq!(Line::parse("space"), Line::Key(' '));
        assert_eq!(Line::parse(" l "), Line::Key('l'));
        assert_eq!(Line::parse("R"), Line::Key('R'));
        assert_eq!(Line::parse(""), Line::Empty);
        assert_eq!(Line::parse("QUIT"), Line::Quit);
        assert_eq!(Line::parse("show"), Line::Show);
    }

    #[test]
    fn parses_arguments() {
        assert_eq!(Line::parse("say Start Timer"), Line::Say("Start Timer".into()));
        assert_eq!(Line::parse("view statistics"), Line::View(View::Analytics));
        assert_eq!(Line::parse("preset 300"), Line::Preset(300));
        assert_eq!(Line::parse("set 1 99 abc"), Line::Set(DurationInputs::new(1, 59, 0)));
        assert_eq!(Line::parse("set 2"), Line::Set(DurationInputs::new(2, 0, 0)));
        assert_eq!(Line::parse("export"), Line::Export(None));
        assert_eq!(Line::parse("export /tmp/x"), Line::Export(Some(PathBuf::from("/tmp/x"))));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(Line::parse("view clock"), Line::Unknown(_)));
        assert!(matches!(Line::parse("preset -5"), Line::Unknown(_)));
        assert!(matches!(Line::parse("dance"), Line::Unknown(_)));
        assert!(matches!(Line::parse("say"), Line::Unknown(_)));
    }
}
