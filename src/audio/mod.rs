//! Spin sound effects
//!
//! `frame_sounds` decides what a frame should sound like; `web` plays it.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

use crate::wheel::SpinEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Pointer crossed into a new sector
    Tick,
    /// Spin landed
    Win,
}

/// Sounds to play for one frame's events
///
/// Oscillators started in the same frame share a start time and merge into
/// one louder click, so several crossings in a frame produce a single tick.
pub fn frame_sounds(events: &[SpinEvent]) -> Vec<SoundEffect> {
    let mut sounds = Vec::new();
    for event in events {
        let sound = match event {
            SpinEvent::Tick { .. } => SoundEffect::Tick,
            SpinEvent::Finished { .. } => SoundEffect::Win,
        };
        if sound == SoundEffect::Tick && sounds.contains(&SoundEffect::Tick) {
            continue;
        }
        sounds.push(sound);
    }
    sounds
}
