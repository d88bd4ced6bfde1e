//! Command routing.
//!
//! Keyboard keys and voice transcripts are two front ends over one
//! [`Command`] enum. Both are gated by the active [`View`]: they resolve to
//! nothing when the targeted engine is not the one on screen.

mod command;
mod keys;
mod voice;

pub use command::{Command, View};
pub use keys::{command_for_key, Key};
pub use voice::{resolve_intent, PhraseRule, VoiceIntent, VoiceRouter, DEFAULT_PHRASE_RULES};
