//! Audio system using Web Audio API
//!
//! Short synthesized cues, no sample files.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::SoundEffect;

/// Peak gain of every cue
const PEAK_GAIN: f32 = 0.1;
/// Envelope floor for exponential ramps (must stay above zero)
const FLOOR_GAIN: f32 = 0.01;

/// C4, E4, G4, C5
const WIN_NOTES: [f32; 4] = [261.63, 329.63, 392.0, 523.25];
const WIN_NOTE_SPACING: f64 = 0.15;
const WIN_NOTE_LENGTH: f64 = 0.3;

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Bounce => self.play_bounce(ctx),
            SoundEffect::PowerUp => self.play_power_up(ctx),
            SoundEffect::Win => self.play_win(ctx),
        }
    }

    /// Oscillator routed through a fresh gain node to the destination
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Sweep `from` to `to` Hz over `length` seconds with a decaying envelope
    fn sweep(
        &self,
        ctx: &AudioContext,
        osc_type: OscillatorType,
        from: f32,
        to: f32,
        length: f64,
    ) {
        let Some((osc, gain)) = self.create_osc(ctx, from, osc_type) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(from, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to, t + length)
            .ok();
        gain.gain().set_value_at_time(PEAK_GAIN, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(FLOOR_GAIN, t + length)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + length).ok();
    }

    /// Bounce - low sine drop
    fn play_bounce(&self, ctx: &AudioContext) {
        self.sweep(ctx, OscillatorType::Sine, 150.0, 100.0, 0.1);
    }

    /// Power-up - rising square chirp
    fn play_power_up(&self, ctx: &AudioContext) {
        self.sweep(ctx, OscillatorType::Square, 400.0, 800.0, 0.2);
    }

    /// Win - major arpeggio
    fn play_win(&self, ctx: &AudioContext) {
        for (i, freq) in WIN_NOTES.iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) else {
                continue;
            };
            let t = ctx.current_time() + i as f64 * WIN_NOTE_SPACING;
            osc.frequency().set_value_at_time(*freq, t).ok();
            gain.gain().set_value_at_time(PEAK_GAIN, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(FLOOR_GAIN, t + WIN_NOTE_LENGTH)
                .ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + WIN_NOTE_LENGTH).ok();
        }
    }
}
