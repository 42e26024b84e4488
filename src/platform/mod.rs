//! Platform abstraction layer
//!
//! The `Host` trait is everything the game needs from its surroundings:
//! - Asset acquisition and release
//! - Audio triggers
//! - Input polling
//! - Draw submission between `begin_frame`/`end_frame`
//! - A monotonic clock
//!
//! `PointerTracker` holds press/move/release state for hosts fed by events.
//! `HeadlessHost` runs anywhere and records what the game asked for.
//! `WebHost` drives a browser canvas through WebGPU and Web Audio.

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::{DrawCall, HeadlessHost, MusicState};
#[cfg(target_arch = "wasm32")]
pub use web::WebHost;

use glam::{Mat4, Vec2};

use crate::assets::AssetError;
use crate::sim::{MonotonicTime, Rect};

/// Opaque texture reference handed out by a host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Opaque short-sound reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub u32);

/// Opaque streaming-music reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MusicHandle(pub u32);

/// Logical keys the game reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Leave the menu
    Start,
    /// Toggle pause
    Pause,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Enter" => Some(Key::Start),
            "Escape" | "p" | "P" => Some(Key::Pause),
            _ => None,
        }
    }
}

/// Press/move/release tracking for a mouse button or touches.
///
/// The pointer is only reported while something is pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerTracker {
    down: bool,
    pos: Option<Vec2>,
}

impl PointerTracker {
    pub fn press(&mut self, pos: Vec2) {
        self.down = true;
        self.pos = Some(pos);
    }

    /// Follow the pointer; ignored while nothing is pressed
    pub fn move_to(&mut self, pos: Vec2) {
        if self.down {
            self.pos = Some(pos);
        }
    }

    pub fn release(&mut self) {
        self.down = false;
        self.pos = None;
    }

    /// A touch lifted. `remaining` is the first touch still down, if any.
    pub fn touch_ended(&mut self, remaining: Option<Vec2>) {
        match remaining {
            Some(pos) => self.move_to(pos),
            None => self.release(),
        }
    }

    pub fn position(&self) -> Option<Vec2> {
        self.pos
    }
}

/// Services the game consumes from the platform
pub trait Host {
    fn load_texture(&mut self, name: &str) -> Result<TextureHandle, AssetError>;
    fn load_sound(&mut self, name: &str) -> Result<SoundHandle, AssetError>;
    fn load_music(&mut self, name: &str) -> Result<MusicHandle, AssetError>;

    fn dispose_texture(&mut self, handle: TextureHandle);
    fn dispose_sound(&mut self, handle: SoundHandle);
    fn dispose_music(&mut self, handle: MusicHandle);

    /// Fire-and-forget one-shot
    fn play_sound(&mut self, handle: SoundHandle);
    /// Start (or resume) looping playback
    fn play_music_looped(&mut self, handle: MusicHandle);
    fn pause_music(&mut self, handle: MusicHandle);
    fn stop_music(&mut self, handle: MusicHandle);

    /// Active pointer/touch in screen pixels (y down), if any
    fn poll_pointer(&self) -> Option<Vec2>;
    /// Key currently held down
    fn is_key_held(&self, key: Key) -> bool;
    /// Key went down since the previous `end_frame`
    fn key_pressed(&self, key: Key) -> bool;

    /// Screen size in pixels
    fn viewport(&self) -> Vec2;

    /// World → NDC transform for the following draws
    fn set_projection(&mut self, combined: &Mat4);
    fn begin_frame(&mut self, clear_color: [f32; 4]);
    /// Draw a texture stretched over a world-space rectangle
    fn draw_sprite(&mut self, texture: TextureHandle, rect: Rect);
    /// Draw text with its baseline-left at a world-space point
    fn draw_text(&mut self, text: &str, pos: Vec2);
    /// Submit the frame and clear per-frame input edges
    fn end_frame(&mut self);

    fn now(&self) -> MonotonicTime;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_key_mapping() {
        assert_eq!(Key::from_dom_key("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_dom_key("D"), Some(Key::Right));
        assert_eq!(Key::from_dom_key(" "), Some(Key::Start));
        assert_eq!(Key::from_dom_key("Escape"), Some(Key::Pause));
        assert_eq!(Key::from_dom_key("Shift"), None);
    }

    #[test]
    fn test_pointer_only_tracked_while_pressed() {
        let mut pointer = PointerTracker::default();
        pointer.move_to(Vec2::new(5.0, 5.0));
        assert_eq!(pointer.position(), None);

        pointer.press(Vec2::new(10.0, 20.0));
        pointer.move_to(Vec2::new(30.0, 20.0));
        assert_eq!(pointer.position(), Some(Vec2::new(30.0, 20.0)));

        pointer.release();
        assert_eq!(pointer.position(), None);
    }

    #[test]
    fn test_lifting_one_of_two_touches_follows_the_other() {
        let mut pointer = PointerTracker::default();
        pointer.press(Vec2::new(100.0, 50.0));
        // Second finger lands, first finger lifts
        pointer.touch_ended(Some(Vec2::new(400.0, 60.0)));
        assert_eq!(pointer.position(), Some(Vec2::new(400.0, 60.0)));

        pointer.touch_ended(None);
        assert_eq!(pointer.position(), None);
    }
}
