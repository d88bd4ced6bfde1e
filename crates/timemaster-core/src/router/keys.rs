use super::command::{Command, View};

/// A key press as delivered by the input surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub key: char,
    /// Focus was inside a text field; shortcuts are suppressed.
    pub in_text_input: bool,
}

impl Key {
    pub fn new(key: char) -> Self {
        Self {
            key,
            in_text_input: false,
        }
    }
}

/// Map a shortcut onto a command for the active view.
///
/// `Space` toggles and `R` resets the engine on screen; `L`/`S` record a lap
/// or split on the stopwatch; `N` skips the pomodoro phase.
pub fn command_for_key(key: Key, view: View) -> Option<Command> {
    if key.in_text_input {
        return None;
    }
    match (key.key.to_ascii_lowercase(), view) {
        (' ', v) => v.engine().map(Command::Toggle),
        ('r', v) => v.engine().map(Command::Reset),
        ('l', View::Stopwatch) => Some(Command::RecordLap),
        ('s', View::Stopwatch) => Some(Command::RecordSplit),
        ('n', View::Pomodoro) => Some(Command::Skip),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::EngineKind;

    #[test]
    fn space_toggles_the_active_engine() {
        assert_eq!(
            command_for_key(Key::new(' '), View::Timer),
            Some(Command::Toggle(EngineKind::Timer))
        );
        assert_eq!(command_for_key(Key::new(' '), View::Analytics), None);
    }

    #[test]
    fn reset_is_case_insensitive() {
        assert_eq!(
            command_for_key(Key::new('R'), View::Pomodoro),
            Some(Command::Reset(EngineKind::Pomodoro))
        );
    }

    #[test]
    fn lap_and_split_only_on_stopwatch() {
        assert_eq!(command_for_key(Key::new('l'), View::Stopwatch), Some(Command::RecordLap));
        assert_eq!(command_for_key(Key::new('S'), View::Stopwatch), Some(Command::RecordSplit));
        assert_eq!(command_for_key(Key::new('l'), View::Timer), None);
    }

    #[test]
    fn skip_only_on_pomodoro() {
        assert_eq!(command_for_key(Key::new('n'), View::Pomodoro), Some(Command::Skip));
        assert_eq!(command_for_key(Key::new('N'), View::Stopwatch), None);
    }

    #[test]
    fn text_input_focus_suppresses_shortcuts() {
        let key = Key {
            key: ' ',
            in_text_input: true,
        };
        assert_eq!(command_for_key(key, View::Stopwatch), None);
    }
}
