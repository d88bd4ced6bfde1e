//! Voice command dispatch.
//!
//! A transcript is lowercased and checked against an ordered table of phrase
//! rules; the first rule with a phrase contained in the transcript wins.
//! Order matters: "stop stopwatch" must hit the stopwatch rule before the
//! bare "stopwatch" navigation rule, and "lap" is checked before "split".

use serde::{Deserialize, Serialize};

use super::command::{Command, View};
use crate::timer::EngineKind;

/// What a recognized phrase asks for, before view gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceIntent {
    Start(EngineKind),
    Pause(EngineKind),
    Reset(EngineKind),
    Lap,
    Split,
    Skip,
    Navigate(View),
}

/// Predicate/intent pair: matches when any phrase is a substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhraseRule {
    pub phrases: &'static [&'static str],
    pub intent: VoiceIntent,
}

impl PhraseRule {
    pub fn matches(&self, transcript: &str) -> bool {
        self.phrases.iter().any(|p| transcript.contains(p))
    }
}

const fn rule(phrases: &'static [&'static str], intent: VoiceIntent) -> PhraseRule {
    PhraseRule { phrases, intent }
}

pub const DEFAULT_PHRASE_RULES: &[PhraseRule] = &[
    rule(&["start stopwatch", "begin stopwatch"], VoiceIntent::Start(EngineKind::Stopwatch)),
    rule(&["pause stopwatch", "stop stopwatch"], VoiceIntent::Pause(EngineKind::Stopwatch)),
    rule(&["reset stopwatch"], VoiceIntent::Reset(EngineKind::Stopwatch)),
    rule(&["lap", "mark"], VoiceIntent::Lap),
    rule(&["split"], VoiceIntent::Split),
    rule(&["start timer", "begin timer"], VoiceIntent::Start(EngineKind::Timer)),
    rule(&["pause timer", "stop timer"], VoiceIntent::Pause(EngineKind::Timer)),
    rule(&["reset timer"], VoiceIntent::Reset(EngineKind::Timer)),
    rule(&["start pomodoro", "begin pomodoro"], VoiceIntent::Start(EngineKind::Pomodoro)),
    rule(&["pause pomodoro", "stop pomodoro"], VoiceIntent::Pause(EngineKind::Pomodoro)),
    rule(&["skip", "next"], VoiceIntent::Skip),
    rule(&["stopwatch"], VoiceIntent::Navigate(View::Stopwatch)),
    rule(&["timer"], VoiceIntent::Navigate(View::Timer)),
    rule(&["pomodoro"], VoiceIntent::Navigate(View::Pomodoro)),
    rule(&["analytics", "statistics"], VoiceIntent::Navigate(View::Analytics)),
];

/// Turn an intent into commands for the current view.
///
/// Starting an engine that is off screen switches to its view and defers the
/// start. Every other engine intent is dropped unless its view is active.
pub fn resolve_intent(intent: VoiceIntent, view: View) -> Vec<Command> {
    let on_screen = |engine: EngineKind| view == View::for_engine(engine);
    match intent {
        VoiceIntent::Start(engine) if on_screen(engine) => vec![Command::Start(engine)],
        VoiceIntent::Start(engine) => vec![
            Command::SwitchView(View::for_engine(engine)),
            Command::DeferredStart(engine),
        ],
        VoiceIntent::Pause(engine) if on_screen(engine) => vec![Command::Pause(engine)],
        VoiceIntent::Reset(engine) if on_screen(engine) => vec![Command::Reset(engine)],
        VoiceIntent::Lap if view == View::Stopwatch => vec![Command::RecordLap],
        VoiceIntent::Split if view == View::Stopwatch => vec![Command::RecordSplit],
        VoiceIntent::Skip if view == View::Pomodoro => vec![Command::Skip],
        VoiceIntent::Navigate(target) => vec![Command::SwitchView(target)],
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone)]
pub struct VoiceRouter {
    rules: Vec<PhraseRule>,
}

impl Default for VoiceRouter {
    fn default() -> Self {
        Self::new(DEFAULT_PHRASE_RULES.to_vec())
    }
}

impl VoiceRouter {
    pub fn new(rules: Vec<PhraseRule>) -> Self {
        Self { rules }
    }

    /// First matching intent, or `None` for unrecognized speech.
    pub fn intent(&self, transcript: &str) -> Option<VoiceIntent> {
        let transcript = transcript.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.matches(&transcript))
            .map(|r| r.intent)
    }

    pub fn route(&self, transcript: &str, view: View) -> Vec<Command> {
        match self.intent(transcript) {
            Some(intent) => {
                tracing::debug!(transcript, ?intent, "voice command");
                resolve_intent(intent, view)
            }
            None => {
                tracing::debug!(transcript, "unrecognized voice command");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins() {
        let router = VoiceRouter::default();
        assert_eq!(
            router.intent("please STOP STOPWATCH now"),
            Some(VoiceIntent::Pause(EngineKind::Stopwatch))
        );
        assert_eq!(router.intent("start timer"), Some(VoiceIntent::Start(EngineKind::Timer)));
        // Bare "stop timer" wins over navigation to the timer view.
        assert_eq!(router.intent("stop timer"), Some(VoiceIntent::Pause(EngineKind::Timer)));
    }

    #[test]
    fn lap_rule_shadows_later_rules() {
        let router = VoiceRouter::default();
        // "mark" is a lap synonym.
        assert_eq!(router.intent("mark it"), Some(VoiceIntent::Lap));
        assert_eq!(router.intent("next please"), Some(VoiceIntent::Skip));
    }

    #[test]
    fn unknown_speech_is_silent() {
        let router = VoiceRouter::default();
        assert_eq!(router.intent("make me a sandwich"), None);
        assert!(router.route("make me a sandwich", View::Stopwatch).is_empty());
    }

    #[test]
    fn start_off_screen_switches_then_defers() {
        assert_eq!(
            resolve_intent(VoiceIntent::Start(EngineKind::Pomodoro), View::Stopwatch),
            vec![
                Command::SwitchView(View::Pomodoro),
                Command::DeferredStart(EngineKind::Pomodoro)
            ]
        );
        assert_eq!(
            resolve_intent(VoiceIntent::Start(EngineKind::Timer), View::Timer),
            vec![Command::Start(EngineKind::Timer)]
        );
    }

    #[test]
    fn off_screen_pause_and_reset_are_dropped() {
        assert!(resolve_intent(VoiceIntent::Pause(EngineKind::Timer), View::Stopwatch).is_empty());
        assert!(resolve_intent(VoiceIntent::Reset(EngineKind::Stopwatch), View::Timer).is_empty());
        assert!(resolve_intent(VoiceIntent::Skip, View::Timer).is_empty());
        assert!(resolve_intent(VoiceIntent::Lap, View::Analytics).is_empty());
    }

    #[test]
    fn navigation_always_applies() {
        let router = VoiceRouter::default();
        assert_eq!(
            router.route("show statistics", View::Timer),
            vec![Command::SwitchView(View::Analytics)]
        );
    }
}
