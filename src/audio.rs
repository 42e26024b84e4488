//! Audio system using Web Audio API
//!
//! Procedurally generated sounds - no external files needed! Manifest
//! sound and music names map onto generators here.

use crate::assets::{DROP_SOUND, RAIN_MUSIC};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Drop lands in the bucket
    WaterDrop,
}

impl SoundEffect {
    pub fn from_asset_name(name: &str) -> Option<Self> {
        match name {
            DROP_SOUND => Some(SoundEffect::WaterDrop),
            _ => None,
        }
    }
}

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    /// Filtered-noise rainfall
    Rain,
}

impl MusicTrack {
    pub fn from_asset_name(name: &str) -> Option<Self> {
        match name {
            RAIN_MUSIC => Some(MusicTrack::Rain),
            _ => None,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{
        AudioBufferSourceNode, AudioContext, BiquadFilterType, GainNode, OscillatorNode,
        OscillatorType,
    };

    use super::{MusicTrack, SoundEffect};
    use crate::settings::Settings;

    /// Rain loop length in seconds
    const RAIN_LOOP_SECS: f32 = 4.0;
    /// Rain sits under the sound effects
    const RAIN_LEVEL: f32 = 0.4;

    /// A looping track currently wired into the graph
    struct PlayingTrack {
        track: MusicTrack,
        source: AudioBufferSourceNode,
        gain: GainNode,
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        sfx_gain: f32,
        music_gain: f32,
        music: Option<PlayingTrack>,
    }

    impl AudioManager {
        pub fn new(settings: &Settings) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                sfx_gain: settings.sfx_gain(),
                music_gain: settings.music_gain(),
                music: None,
            }
        }

        pub fn is_available(&self) -> bool {
            self.ctx.is_some()
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.sfx_gain;
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::WaterDrop => self.play_water_drop(ctx, vol),
            }
        }

        /// Start a looping track, or unpause it if it is already wired up
        pub fn start_music(&mut self, track: MusicTrack) {
            let Some(ctx) = self.ctx.clone() else { return };

            if let Some(playing) = &self.music {
                if playing.track == track {
                    playing.gain.gain().set_value(self.music_gain * RAIN_LEVEL);
                    let _ = ctx.resume();
                    return;
                }
            }
            self.stop_music();

            let playing = match track {
                MusicTrack::Rain => self.build_rain(&ctx),
            };
            match playing {
                Some(p) => {
                    let _ = ctx.resume();
                    self.music = Some(p);
                    log::info!("Music started: {track:?}");
                }
                None => log::warn!("Could not start {track:?} music"),
            }
        }

        /// Silence the loop but keep it wired for a quick resume
        pub fn pause_music(&self) {
            if let Some(playing) = &self.music {
                playing.gain.gain().set_value(0.0);
            }
        }

        pub fn stop_music(&mut self) {
            if let Some(playing) = self.music.take() {
                let _ = playing.source.stop();
                let _ = playing.source.disconnect();
                let _ = playing.gain.disconnect();
                log::info!("Music stopped: {:?}", playing.track);
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

        /// Water drop - quick upward "bloop"
        fn play_water_drop(&self, ctx: &AudioContext, vol: f32) {
            let t = ctx.current_time();

            if let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.5, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                    .ok();
                osc.frequency().set_value_at_time(500.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(1400.0, t + 0.08)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.18).ok();
            }

            // Soft splash body
            if let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(vol * 0.15, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.06)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.08).ok();
            }
        }

        /// Rain - looped white noise through a low-pass filter
        fn build_rain(&self, ctx: &AudioContext) -> Option<PlayingTrack> {
            let rate = ctx.sample_rate();
            let frames = (rate * RAIN_LOOP_SECS) as u32;
            let buffer = ctx.create_buffer(1, frames, rate).ok()?;

            // xorshift noise
            let mut seed: u32 = 0x9E37_79B9;
            let mut samples: Vec<f32> = (0..frames)
                .map(|_| {
                    seed ^= seed << 13;
                    seed ^= seed >> 17;
                    seed ^= seed << 5;
                    (seed as f32 / u32::MAX as f32) * 2.0 - 1.0
                })
                .collect();
            buffer.copy_to_channel(&mut samples, 0).ok()?;

            let source = ctx.create_buffer_source().ok()?;
            source.set_buffer(Some(&buffer));
            source.set_loop(true);

            let filter = ctx.create_biquad_filter().ok()?;
            filter.set_type(BiquadFilterType::Lowpass);
            filter.frequency().set_value(1200.0);

            let gain = ctx.create_gain().ok()?;
            gain.gain().set_value(self.music_gain * RAIN_LEVEL);

            source.connect_with_audio_node(&filter).ok()?;
            filter.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            source.start().ok()?;

            Some(PlayingTrack {
                track: MusicTrack::Rain,
                source,
                gain,
            })
        }
    }

    impl Drop for AudioManager {
        fn drop(&mut self) {
            self.stop_music();
            if let Some(ctx) = &self.ctx {
                let _ = ctx.close();
            }
        }
    }
}
