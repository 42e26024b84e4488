//! Data-driven game balance
//!
//! Every number the simulation reads comes from here, so tests and
//! settings files can reshape the game without touching `sim`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::consts::*;

/// Simulation tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// World width in units
    pub screen_width: f32,
    /// World height in units
    pub screen_height: f32,
    /// Bucket and drop width/height
    pub sprite_size: f32,
    /// Bucket bottom edge
    pub bucket_y: f32,
    /// Keyboard movement speed (units/s)
    pub bucket_speed: f32,
    /// Drop fall speed (units/s)
    pub fall_speed: f32,
    /// Seconds between spawns
    pub spawn_interval_secs: f32,
    /// Width used to center the bucket under the pointer.
    ///
    /// Defaults to 62, which puts the bucket one unit right of true center.
    pub touch_center_width: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            sprite_size: SPRITE_SIZE,
            bucket_y: BUCKET_Y,
            bucket_speed: BUCKET_SPEED,
            fall_speed: DROP_FALL_SPEED,
            spawn_interval_secs: SPAWN_INTERVAL_SECS,
            touch_center_width: TOUCH_CENTER_WIDTH,
        }
    }
}

/// Longest spawn interval a settings file may ask for (one hour)
pub const MAX_SPAWN_INTERVAL_SECS: f32 = 3600.0;

impl Tuning {
    /// Spawn interval as a `Duration`
    pub fn spawn_interval(&self) -> Duration {
        Duration::try_from_secs_f32(self.spawn_interval_secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// Rightmost x a sprite may occupy
    pub fn max_x(&self) -> f32 {
        (self.screen_width - self.sprite_size).max(0.0)
    }

    /// Bucket x that centers it horizontally
    pub fn bucket_start_x(&self) -> f32 {
        self.screen_width / 2.0 - self.sprite_size / 2.0
    }

    /// Clamp nonsensical values loaded from a settings file
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.screen_width > 0.0) {
            self.screen_width = defaults.screen_width;
        }
        if !(self.screen_height > 0.0) {
            self.screen_height = defaults.screen_height;
        }
        if !(self.sprite_size > 0.0) || self.sprite_size > self.screen_width {
            self.sprite_size = defaults.sprite_size.min(self.screen_width);
        }
        if !self.bucket_speed.is_finite() || self.bucket_speed < 0.0 {
            self.bucket_speed = defaults.bucket_speed;
        }
        if !self.fall_speed.is_finite() || self.fall_speed <= 0.0 {
            self.fall_speed = defaults.fall_speed;
        }
        if !self.spawn_interval_secs.is_finite() || self.spawn_interval_secs < 0.0 {
            self.spawn_interval_secs = defaults.spawn_interval_secs;
        }
        self.spawn_interval_secs = self.spawn_interval_secs.min(MAX_SPAWN_INTERVAL_SECS);
        if !self.touch_center_width.is_finite() {
            self.touch_center_width = defaults.touch_center_width;
        }
        self
    }
}
