//! Audio system using Web Audio API
//!
//! Every cue is synthesized from fresh oscillator/gain nodes, so the same
//! sound can overlap itself without cutting off an earlier play.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::SoundCue;

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
        // Fails outside a secure context
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

    /// Play a cue at the volume the settings allow
    pub fn play(&self, cue: SoundCue, settings: &Settings) {
        let vol = settings.effective_volume(cue.volume());
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            SoundCue::Bounce => self.play_bounce(ctx, vol),
            SoundCue::Goal => self.play_goal(ctx, vol),
            SoundCue::Scored => self.play_scored(ctx, vol),
            SoundCue::GameStart => self.play_game_start(ctx, vol),
            SoundCue::GameOver => self.play_game_over(ctx, vol),
            SoundCue::ButtonTouch => self.play_button(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
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

    /// Single decaying tone starting `delay` seconds from now
    fn tone(&self, ctx: &AudioContext, freq: f32, osc_type: OscillatorType, peak: f32, delay: f64, length: f64) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time() + delay;

        gain.gain().set_value_at_time(0.0, ctx.current_time()).ok();
        gain.gain().set_value_at_time(peak, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + length)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + length + 0.02).ok();
    }

    /// Ball on pin - short tick
    fn play_bounce(&self, ctx: &AudioContext, vol: f32) {
        self.tone(ctx, 900.0, OscillatorType::Triangle, vol * 0.5, 0.0, 0.05);
    }

    /// Ball crossed the line - falling blip
    fn play_goal(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(500.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(180.0, t + 0.2)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.25).ok();
    }

    /// Ball in the basket - bright two-note chime
    fn play_scored(&self, ctx: &AudioContext, vol: f32) {
        self.tone(ctx, 1046.5, OscillatorType::Sine, vol * 0.4, 0.0, 0.12);
        self.tone(ctx, 1568.0, OscillatorType::Sine, vol * 0.35, 0.06, 0.2);
    }

    /// Rising arpeggio
    fn play_game_start(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [523.25, 659.25, 783.99].into_iter().enumerate() {
            self.tone(ctx, freq, OscillatorType::Square, vol * 0.2, i as f64 * 0.1, 0.15);
        }
    }

    /// Falling arpeggio
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [392.0, 311.13, 261.63, 196.0].into_iter().enumerate() {
            self.tone(ctx, freq, OscillatorType::Triangle, vol * 0.35, i as f64 * 0.15, 0.25);
        }
    }

    /// Menu click
    fn play_button(&self, ctx: &AudioContext, vol: f32) {
        self.tone(ctx, 660.0, OscillatorType::Square, vol * 0.15, 0.0, 0.04);
    }
}
