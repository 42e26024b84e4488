//! Headless host
//!
//! No window, no audio device. Time moves only when `advance` is called,
//! input is scripted, and every draw and audio trigger is recorded so the
//! native demo and the tests can inspect what the game did.

use std::collections::{HashMap, HashSet};

use glam::{Mat4, Vec2};

use super::{Host, Key, MusicHandle, SoundHandle, TextureHandle};
use crate::assets::{AssetError, AssetKind, MANIFEST};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::{Clock, ManualClock, MonotonicTime, Rect};

/// One recorded draw
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear([f32; 4]),
    Sprite { texture: TextureHandle, rect: Rect },
    Text { text: String, pos: Vec2 },
}

/// Playback state of a music handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// A host that records instead of presenting
#[derive(Debug)]
pub struct HeadlessHost {
    clock: ManualClock,
    viewport: Vec2,
    available: HashSet<(AssetKind, String)>,
    next_handle: u32,
    live: HashMap<(AssetKind, u32), String>,
    pointer: Option<Vec2>,
    held: HashSet<Key>,
    pressed: HashSet<Key>,
    in_frame: bool,
    /// Projection most recently handed over by the game
    pub projection: Mat4,
    current: Vec<DrawCall>,
    /// Draw calls of the most recently finished frame
    pub last_frame: Vec<DrawCall>,
    /// Frames submitted so far
    pub frames: u64,
    /// Every `play_sound` call, in order
    pub sounds_played: Vec<SoundHandle>,
    music: HashMap<u32, MusicState>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    /// Host that can serve the whole game manifest, with a viewport the
    /// size of the world
    pub fn new() -> Self {
        Self {
            clock: ManualClock::new(),
            viewport: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            available: MANIFEST
                .iter()
                .map(|(kind, name)| (*kind, name.to_string()))
                .collect(),
            next_handle: 1,
            live: HashMap::new(),
            pointer: None,
            held: HashSet::new(),
            pressed: HashSet::new(),
            in_frame: false,
            projection: Mat4::IDENTITY,
            current: Vec::new(),
            last_frame: Vec::new(),
            frames: 0,
            sounds_played: Vec::new(),
            music: HashMap::new(),
        }
    }

    /// Remove an asset from what the host can serve
    pub fn without_asset(mut self, name: &str) -> Self {
        self.available.retain(|(_, n)| n != name);
        self
    }

    pub fn with_viewport(mut self, viewport: Vec2) -> Self {
        self.viewport = viewport;
        self
    }

    /// Move the clock forward by a frame delta (seconds)
    pub fn advance(&mut self, delta: f32) {
        self.clock.advance_secs(delta);
    }

    /// Set or clear the pointer, in screen pixels
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.pointer = pointer;
    }

    pub fn hold_key(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release_key(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Press-and-release within one frame
    pub fn tap_key(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    /// Handles acquired and not yet disposed
    pub fn live_assets(&self) -> usize {
        self.live.len()
    }

    pub fn music_state(&self, handle: MusicHandle) -> MusicState {
        self.music.get(&handle.0).copied().unwrap_or_default()
    }

    /// Texts drawn in the last finished frame
    pub fn last_texts(&self) -> Vec<&str> {
        self.last_frame
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Sprites drawn in the last finished frame
    pub fn last_sprites(&self) -> Vec<(TextureHandle, Rect)> {
        self.last_frame
            .iter()
            .filter_map(|call| match call {
                DrawCall::Sprite { texture, rect } => Some((*texture, *rect)),
                _ => None,
            })
            .collect()
    }

    fn acquire(&mut self, kind: AssetKind, name: &str) -> Result<u32, AssetError> {
        if !self.available.contains(&(kind, name.to_string())) {
            return Err(AssetError::missing(kind, name));
        }
        let id = self.next_handle;
        self.next_handle += 1;
        self.live.insert((kind, id), name.to_string());
        log::debug!("Loaded {kind} '{name}' as #{id}");
        Ok(id)
    }

    fn release(&mut self, kind: AssetKind, id: u32) {
        if self.live.remove(&(kind, id)).is_none() {
            log::warn!("Dispose of unknown {kind} #{id}");
        }
    }

    fn record(&mut self, call: DrawCall) {
        if !self.in_frame {
            log::warn!("Draw outside begin_frame/end_frame: {call:?}");
            return;
        }
        self.current.push(call);
    }
}

impl Host for HeadlessHost {
    fn load_texture(&mut self, name: &str) -> Result<TextureHandle, AssetError> {
        self.acquire(AssetKind::Texture, name).map(TextureHandle)
    }

    fn load_sound(&mut self, name: &str) -> Result<SoundHandle, AssetError> {
        self.acquire(AssetKind::Sound, name).map(SoundHandle)
    }

    fn load_music(&mut self, name: &str) -> Result<MusicHandle, AssetError> {
        self.acquire(AssetKind::Music, name).map(MusicHandle)
    }

    fn dispose_texture(&mut self, handle: TextureHandle) {
        self.release(AssetKind::Texture, handle.0);
    }

    fn dispose_sound(&mut self, handle: SoundHandle) {
        self.release(AssetKind::Sound, handle.0);
    }

    fn dispose_music(&mut self, handle: MusicHandle) {
        self.music.remove(&handle.0);
        self.release(AssetKind::Music, handle.0);
    }

    fn play_sound(&mut self, handle: SoundHandle) {
        self.sounds_played.push(handle);
    }

    fn play_music_looped(&mut self, handle: MusicHandle) {
        self.music.insert(handle.0, MusicState::Playing);
    }

    fn pause_music(&mut self, handle: MusicHandle) {
        if let Some(state) = self.music.get_mut(&handle.0) {
            if *state == MusicState::Playing {
                *state = MusicState::Paused;
            }
        }
    }

    fn stop_music(&mut self, handle: MusicHandle) {
        self.music.insert(handle.0, MusicState::Stopped);
    }

    fn poll_pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    fn is_key_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn key_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn viewport(&self) -> Vec2 {
        self.viewport
    }

    fn set_projection(&mut self, combined: &Mat4) {
        self.projection = *combined;
    }

    fn begin_frame(&mut self, clear_color: [f32; 4]) {
        self.in_frame = true;
        self.current.clear();
        self.current.push(DrawCall::Clear(clear_color));
    }

    fn draw_sprite(&mut self, texture: TextureHandle, rect: Rect) {
        self.record(DrawCall::Sprite { texture, rect });
    }

    fn draw_text(&mut self, text: &str, pos: Vec2) {
        self.record(DrawCall::Text {
            text: text.to_string(),
            pos,
        });
    }

    fn end_frame(&mut self) {
        self.in_frame = false;
        self.last_frame = std::mem::take(&mut self.current);
        self.pressed.clear();
        self.frames += 1;
    }

    fn now(&self) -> MonotonicTime {
        self.clock.now()
    }
}
