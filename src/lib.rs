//! Raindrop - catch the falling drops with a bucket
//!
//! Core modules:
//! - `sim`: Simulation loop (bucket input, drop spawning, falling, catching)
//! - `game`: Presentation shell driving the simulation against a `Host`
//! - `platform`: Host abstraction plus the headless and browser hosts
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod audio;
pub mod camera;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use assets::{AssetError, AssetKind, Assets};
pub use game::{FrameState, Game};
pub use settings::{Settings, SettingsError};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// World dimensions (camera viewport in world units)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 480.0;

    /// Bucket and drop sprites share one size
    pub const SPRITE_SIZE: f32 = 64.0;

    /// Bucket bottom edge sits this far above the bottom of the screen
    pub const BUCKET_Y: f32 = 20.0;
    /// Keyboard bucket speed (units/s, no acceleration)
    pub const BUCKET_SPEED: f32 = 200.0;
    /// Pointer centering width. One unit narrower than the sprite.
    pub const TOUCH_CENTER_WIDTH: f32 = 62.0;

    /// Drop fall speed (units/s)
    pub const DROP_FALL_SPEED: f32 = 200.0;
    /// Time between drop spawns
    pub const SPAWN_INTERVAL_SECS: f32 = 1.0;

    /// Dark blue background
    pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.2, 1.0];

    /// Score readout position (world units)
    pub const SCORE_TEXT_X: f32 = 0.0;
    pub const SCORE_TEXT_Y: f32 = 400.0;
    pub const SCORE_LABEL: &str = "Drops Collected: ";

    /// Main menu text
    pub const MENU_TITLE: &str = "Welcome to Drop!!!";
    pub const MENU_PROMPT: &str = "Tap anywhere to begin!";
}

/// Format the running score readout
#[inline]
pub fn score_text(score: u32) -> String {
    format!("{}{}", consts::SCORE_LABEL, score)
}
