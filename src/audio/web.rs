//! Web Audio playback
//!
//! Procedurally generated sound effects - no external files needed!
//! Every failure here is swallowed: sound must never interrupt a spin.

use web_sys::{AudioContext, AudioNode, GainNode, OscillatorNode, OscillatorType};

use super::SoundEffect;

/// C major arpeggio for the win fanfare: C5, E5, G5, C6
const WIN_NOTES: [f32; 4] = [523.25, 659.25, 783.99, 1046.50];

/// Audio manager for the wheel
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, volume: 0.8 }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set effective volume (0.0 - 1.0, already combining master/sfx/mute)
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let played = match effect {
            SoundEffect::Tick => self.play_tick(ctx, vol),
            SoundEffect::Win => self.play_win(ctx, vol),
        };
        if played.is_none() {
            log::debug!("Sound {:?} could not be played", effect);
        }
    }

    // === Sound generators ===

    /// Create an oscillator feeding a gain node connected to `dest`
    fn create_osc(
        &self,
        ctx: &AudioContext,
        dest: &AudioNode,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(dest).ok()?;

        Some((osc, gain))
    }

    /// Tick - short wood-block click, pitch varied slightly per tick
    fn play_tick(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
        let freq = 600.0 + js_sys::Math::random() as f32 * 50.0;
        let (osc, gain) = self.create_osc(ctx, &ctx.destination(), freq, OscillatorType::Triangle)?;
        let t = ctx.current_time();

        gain.gain().set_value_at_time(0.0, t).ok()?;
        gain.gain()
            .linear_ramp_to_value_at_time(vol * 0.15, t + 0.005)
            .ok()?;
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + 0.05)
            .ok()?;

        osc.start_with_when(t).ok()?;
        osc.stop_with_when(t + 0.06).ok()?;
        Some(())
    }

    /// Win - rising arpeggio through a shared master gain
    fn play_win(&self, ctx: &AudioContext, vol: f32) -> Option<()> {
        let master = ctx.create_gain().ok()?;
        master.connect_with_audio_node(&ctx.destination()).ok()?;
        master.gain().set_value(vol * 0.3);

        let start = ctx.current_time();
        for (i, freq) in WIN_NOTES.iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, &master, *freq, OscillatorType::Sine)
            else {
                continue;
            };
            let t = start + i as f64 * 0.12;
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain().linear_ramp_to_value_at_time(1.0, t + 0.05).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.8)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 1.0).ok();
        }
        Some(())
    }
}
