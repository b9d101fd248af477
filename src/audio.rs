//! Audio system using the Web Audio API
//!
//! Procedurally generated sound effects - no asset files needed. The sim
//! never plays audio; the host maps drained `GameEvent`s to effects here.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Item landed in its correct pan
    Catch,
    /// Duck knocked off the left stack
    QuackKnock,
    /// Jam jar knocked off the right stack
    GlassKnock,
    /// Imbalance ended the run
    GameOver,
    /// The finished run set a new best score
    HighScore,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
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
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Browsers suspend the context until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Catch => self.play_catch(ctx, vol),
            SoundEffect::QuackKnock => self.play_quack(ctx, vol),
            SoundEffect::GlassKnock => self.play_glass(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
            SoundEffect::HighScore => self.play_high_score(ctx, vol),
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

    /// Correct catch - bright rising chirp
    fn play_catch(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 520.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(520.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(980.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Duck knocked off - nasal descending wah
    fn play_quack(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 380.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.22)
                .ok();
            osc.frequency().set_value_at_time(380.0, t).ok();
            osc.frequency().set_value_at_time(300.0, t + 0.06).ok();
            osc.frequency().set_value_at_time(340.0, t + 0.1).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(180.0, t + 0.2)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        // Body resonance under the honk
        if let Some((osc, gain)) = self.create_osc(ctx, 140.0, OscillatorType::Triangle) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.18).ok();
        }
    }

    /// Jam jar knocked off - crackling glass shatter
    fn play_glass(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        // Crackling frequency jumps
        if let Some((osc, gain)) = self.create_osc(ctx, 100.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.16)
                .ok();
            osc.frequency().set_value_at_time(100.0, t).ok();
            osc.frequency().set_value_at_time(3500.0, t + 0.01).ok();
            osc.frequency().set_value_at_time(200.0, t + 0.02).ok();
            osc.frequency().set_value_at_time(4000.0, t + 0.03).ok();
            osc.frequency().set_value_at_time(150.0, t + 0.05).ok();
            osc.frequency().set_value_at_time(2500.0, t + 0.08).ok();
            osc.frequency().set_value_at_time(80.0, t + 0.12).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.18).ok();
        }

        // High frequency sizzle
        if let Some((osc, gain)) = self.create_osc(ctx, 6000.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.1, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.frequency().set_value_at_time(6000.0, t).ok();
            osc.frequency().set_value_at_time(8000.0, t + 0.02).ok();
            osc.frequency().set_value_at_time(5000.0, t + 0.05).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.12).ok();
        }
    }

    /// Run ended - slow descending sting
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 320.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.9)
                .ok();
            osc.frequency().set_value_at_time(320.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.8)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 1.0).ok();
        }

        // Low rumble for weight
        if let Some((osc, gain)) = self.create_osc(ctx, 55.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.7)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.8).ok();
        }
    }

    /// New best score - ascending arpeggio
    fn play_high_score(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [523.0f32, 659.0, 784.0, 1047.0].iter().enumerate() {
            let start = t + i as f64 * 0.09;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(0.0001, t).ok();
                gain.gain().set_value_at_time(vol * 0.3, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.2)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.25).ok();
            }
        }
    }
}
