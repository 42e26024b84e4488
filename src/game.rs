//! Presentation shell
//!
//! `Game` owns the simulation, the camera and the session's assets. A host
//! loop calls `init` once, `step` every frame and `shutdown` once; the game
//! never drives its own loop.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::assets::{AssetError, Assets};
use crate::camera::OrthoCamera;
use crate::consts::*;
use crate::platform::{Host, Key};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, RandomRange, Rect, TickInput, tick};
use crate::tuning::Tuning;

/// Snapshot returned from every `step`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    pub phase: GamePhase,
    pub score: u32,
    pub bucket: Rect,
    pub raindrops: usize,
    pub events: Vec<GameEvent>,
}

/// A running session
pub struct Game<R: RandomRange = Pcg32> {
    state: GameState,
    assets: Assets,
    camera: OrthoCamera,
    rng: R,
    /// Screen is visible
    shown: bool,
}

impl Game<Pcg32> {
    /// Load assets and set up a session from settings.
    ///
    /// The RNG is seeded from `settings.seed`, or from the host clock.
    pub fn init(host: &mut impl Host, settings: &Settings) -> Result<Self, AssetError> {
        let seed = settings.seed.unwrap_or_else(|| host.now().as_nanos());
        log::info!("Game initialized with seed: {}", seed);
        Self::with_rng(host, settings.tuning.clone(), Pcg32::seed_from_u64(seed))
    }
}

impl<R: RandomRange> Game<R> {
    /// Load assets with an explicit randomness source
    pub fn with_rng(host: &mut impl Host, tuning: Tuning, rng: R) -> Result<Self, AssetError> {
        let assets = Assets::load(host)?;
        let mut camera = OrthoCamera::new(tuning.screen_width, tuning.screen_height);
        camera.set_viewport(host.viewport());

        Ok(Self {
            state: GameState::new(tuning),
            assets,
            camera,
            rng,
            shown: true,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn camera(&self) -> &OrthoCamera {
        &self.camera
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Run one frame: sample input, simulate, trigger audio, draw.
    pub fn step(&mut self, host: &mut impl Host, delta: f32) -> FrameState {
        let now = host.now();

        self.camera.set_viewport(host.viewport());
        self.camera.update();

        let input = self.sample_input(host);
        let events = tick(&mut self.state, &input, delta, now, &mut self.rng);
        self.dispatch_audio(host, &events);

        self.draw(host);

        FrameState {
            phase: self.state.phase,
            score: self.state.score,
            bucket: self.state.bucket.rect,
            raindrops: self.state.raindrops.len(),
            events,
        }
    }

    /// Screen became visible again. Restarts the music if play is running.
    pub fn show(&mut self, host: &mut impl Host) {
        if self.shown {
            return;
        }
        self.shown = true;
        if self.state.phase == GamePhase::Playing {
            host.play_music_looped(self.assets.rain_music);
        }
        log::info!("Screen shown");
    }

    /// Screen hidden: stop the music. Whether play also freezes is up to
    /// the caller (see `pause`).
    pub fn hide(&mut self, host: &mut impl Host) {
        if !self.shown {
            return;
        }
        self.shown = false;
        host.stop_music(self.assets.rain_music);
        log::info!("Screen hidden");
    }

    /// Freeze play (e.g. window blur). No-op unless playing.
    pub fn pause(&mut self, host: &mut impl Host) -> bool {
        let paused = self.state.pause(host.now());
        if paused {
            host.pause_music(self.assets.rain_music);
            log::info!("Paused");
        }
        paused
    }

    /// Unfreeze. No-op unless paused.
    pub fn resume(&mut self, host: &mut impl Host) -> bool {
        let resumed = self.state.resume(host.now());
        if resumed {
            if self.shown {
                host.play_music_looped(self.assets.rain_music);
            }
            log::info!("Resumed");
        }
        resumed
    }

    /// Release every asset. Consumes the game, so it runs exactly once.
    pub fn shutdown(self, host: &mut impl Host) {
        log::info!(
            "Session over: {} drops collected in {} frames",
            self.state.score,
            self.state.frames
        );
        self.assets.dispose(host);
    }

    fn sample_input(&self, host: &impl Host) -> TickInput {
        TickInput {
            pointer: host.poll_pointer().map(|p| self.camera.unproject(p)),
            left: host.is_key_held(Key::Left),
            right: host.is_key_held(Key::Right),
            start: host.key_pressed(Key::Start),
            pause: host.key_pressed(Key::Pause),
        }
    }

    fn dispatch_audio(&self, host: &mut impl Host, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Collected { .. } => host.play_sound(self.assets.drop_sound),
                GameEvent::Started | GameEvent::Resumed => {
                    if self.shown {
                        host.play_music_looped(self.assets.rain_music);
                    }
                }
                GameEvent::Paused => host.pause_music(self.assets.rain_music),
                GameEvent::Spawned { .. } | GameEvent::Missed => {}
            }
        }
    }

    fn draw(&self, host: &mut impl Host) {
        host.set_projection(&self.camera.combined);
        host.begin_frame(CLEAR_COLOR);

        match self.state.phase {
            GamePhase::Menu => {
                host.draw_text(MENU_TITLE, Vec2::new(100.0, 150.0));
                host.draw_text(MENU_PROMPT, Vec2::new(100.0, 100.0));
            }
            GamePhase::Playing | GamePhase::Paused => {
                host.draw_text(
                    &crate::score_text(self.state.score),
                    Vec2::new(SCORE_TEXT_X, SCORE_TEXT_Y),
                );
                host.draw_sprite(self.assets.bucket, self.state.bucket.rect);
                for raindrop in &self.state.raindrops {
                    host.draw_sprite(self.assets.drop, raindrop.rect);
                }
                if self.state.phase == GamePhase::Paused {
                    let center = Vec2::new(
                        self.state.tuning.screen_width / 2.0 - 40.0,
                        self.state.tuning.screen_height / 2.0,
                    );
                    host.draw_text("Paused", center);
                }
            }
        }

        host.end_frame();
    }
}
