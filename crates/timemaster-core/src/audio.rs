//! Alarm playback.
//!
//! The widget only needs two operations from its audio collaborator. Playback
//! failures are reported back as [`AudioError`] but never escape
//! [`play_alarm`]: they are logged and the expiry carries on.

use std::io::Write;

use crate::error::AudioError;

pub trait AudioPlayer {
    /// 0.0 (silent) to 1.0 (full).
    fn set_volume(&mut self, volume: f32);
    /// Rewind and play the alarm sound.
    fn play_from_start(&mut self) -> Result<(), AudioError>;
}

/// Rings the terminal bell on stderr. Silent at volume zero.
#[derive(Debug, Default)]
pub struct TerminalBell {
    volume: f32,
}

impl AudioPlayer for TerminalBell {
    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn play_from_start(&mut self) -> Result<(), AudioError> {
        if self.volume <= 0.0 {
            return Ok(());
        }
        let mut err = std::io::stderr();
        err.write_all(b"\x07")
            .and_then(|_| err.flush())
            .map_err(|e| AudioError::Playback(e.to_string()))
    }
}

/// No output at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AudioPlayer for Silent {
    fn set_volume(&mut self, _volume: f32) {}

    fn play_from_start(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Set the volume and play, logging any failure.
pub fn play_alarm(player: &mut dyn AudioPlayer, volume: f32) {
    player.set_volume(volume);
    if let Err(e) = player.play_from_start() {
        tracing::warn!(error = %e, "alarm playback failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken {
        attempts: u32,
    }

    impl AudioPlayer for Broken {
        fn set_volume(&mut self, _volume: f32) {}

        fn play_from_start(&mut self) -> Result<(), AudioError> {
            self.attempts += 1;
            Err(AudioError::Unavailable)
        }
    }

    #[test]
    fn failures_are_swallowed() {
        let mut player = Broken { attempts: 0 };
        play_alarm(&mut player, 0.5);
        play_alarm(&mut player, 0.5);
        assert_eq!(player.attempts, 2);
    }

    #[test]
    fn bell_clamps_volume_and_is_silent_at_zero() {
        let mut bell = TerminalBell::default();
        bell.set_volume(3.0);
        assert_eq!(bell.volume, 1.0);
        bell.set_volume(0.0);
        assert!(bell.play_from_start().is_ok());
    }
}
