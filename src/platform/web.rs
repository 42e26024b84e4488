//! Browser host
//!
//! Sprites become colored triangles drawn through `SpriteRenderer`, sounds
//! and music come from the procedural `AudioManager`, and text is laid out
//! as absolutely-positioned DOM nodes over the canvas. Input arrives from
//! DOM event handlers through the `pointer_*` / `key_*` methods.

use std::collections::{HashMap, HashSet};

use glam::{Mat4, Vec2, Vec3};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, HtmlElement};

use super::{Host, Key, MusicHandle, PointerTracker, SoundHandle, TextureHandle};
use crate::assets::{AssetError, AssetKind};
use crate::audio::{AudioManager, MusicTrack, SoundEffect};
use crate::renderer::{SpriteRenderer, SpriteShape, Vertex};
use crate::settings::Settings;
use crate::sim::{MonotonicTime, Rect};

/// DOM element the text nodes are placed in
const OVERLAY_ID: &str = "overlay";

/// Pooled text nodes over the canvas
struct TextOverlay {
    document: Document,
    container: Option<HtmlElement>,
    nodes: Vec<HtmlElement>,
}

impl TextOverlay {
    fn new(document: Document) -> Self {
        let container = document
            .get_element_by_id(OVERLAY_ID)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if container.is_none() {
            log::warn!("No #{OVERLAY_ID} element - text will not be shown");
        }
        Self {
            document,
            container,
            nodes: Vec::new(),
        }
    }

    /// Show exactly `texts`, placed in percent of the overlay
    fn sync(&mut self, texts: &[(String, Vec2)]) {
        let Some(container) = &self.container else {
            return;
        };

        while self.nodes.len() < texts.len() {
            let Some(node) = self
                .document
                .create_element("div")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            else {
                return;
            };
            let _ = node.set_attribute("class", "overlay-text");
            let _ = container.append_child(&node);
            self.nodes.push(node);
        }

        for (i, node) in self.nodes.iter().enumerate() {
            let style = node.style();
            match texts.get(i) {
                Some((text, percent)) => {
                    if node.text_content().as_deref() != Some(text.as_str()) {
                        node.set_text_content(Some(text));
                    }
                    let _ = style.set_property("left", &format!("{:.2}%", percent.x));
                    let _ = style.set_property("bottom", &format!("{:.2}%", percent.y));
                    let _ = style.set_property("display", "block");
                }
                None => {
                    let _ = style.set_property("display", "none");
                }
            }
        }
    }

    fn clear(&mut self) {
        for node in self.nodes.drain(..) {
            node.remove();
        }
    }
}

/// Host backed by a canvas, WebGPU and Web Audio
pub struct WebHost {
    canvas: HtmlCanvasElement,
    renderer: SpriteRenderer,
    audio: AudioManager,
    overlay: TextOverlay,

    next_handle: u32,
    textures: HashMap<u32, SpriteShape>,
    sounds: HashMap<u32, SoundEffect>,
    music: HashMap<u32, MusicTrack>,

    pointer: PointerTracker,
    held: HashSet<Key>,
    pressed: HashSet<Key>,

    projection: Mat4,
    clear_color: [f32; 4],
    vertices: Vec<Vertex>,
    texts: Vec<(String, Vec2)>,
}

impl WebHost {
    /// Bring up WebGPU on the canvas and open an audio context
    pub async fn new(canvas: HtmlCanvasElement, settings: &Settings) -> Result<Self, String> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let (width, height) = backing_size(&canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| format!("Failed to create surface: {e}"))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| format!("Failed to get adapter: {e}"))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let renderer = SpriteRenderer::new(surface, &adapter, width, height)
            .await
            .map_err(|e| format!("Failed to get device: {e}"))?;

        let audio = AudioManager::new(settings);

        Ok(Self {
            canvas,
            renderer,
            audio,
            overlay: TextOverlay::new(document),
            next_handle: 1,
            textures: HashMap::new(),
            sounds: HashMap::new(),
            music: HashMap::new(),
            pointer: PointerTracker::default(),
            held: HashSet::new(),
            pressed: HashSet::new(),
            projection: Mat4::IDENTITY,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            vertices: Vec::new(),
            texts: Vec::new(),
        })
    }

    /// Press at a canvas-relative position (CSS pixels)
    pub fn pointer_down(&mut self, pos: Vec2) {
        self.pointer.press(pos);
        // Browsers only let audio start from inside a gesture
        self.audio.resume();
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        self.pointer.move_to(pos);
    }

    pub fn pointer_up(&mut self) {
        self.pointer.release();
    }

    /// A touch lifted; `remaining` is the first touch still down, if any
    pub fn touch_ended(&mut self, remaining: Option<Vec2>) {
        self.pointer.touch_ended(remaining);
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pressed.insert(key);
        }
        self.audio.resume();
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Drop all held input (focus lost)
    pub fn release_all(&mut self) {
        self.held.clear();
        self.pointer_up();
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    /// Match the backing store to the displayed size
    fn sync_canvas_size(&mut self) {
        let (width, height) = backing_size(&self.canvas);
        if (width, height) != self.renderer.size && width > 0 && height > 0 {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
            self.renderer.resize(width, height);
            log::debug!("Canvas resized to {width}x{height}");
        }
    }

    /// World point → percent of the overlay, measured from bottom-left
    fn overlay_percent(&self, pos: Vec2) -> Vec2 {
        let ndc = self.projection.project_point3(Vec3::new(pos.x, pos.y, 0.0));
        Vec2::new((ndc.x + 1.0) * 50.0, (ndc.y + 1.0) * 50.0)
    }
}

/// Canvas client size scaled by the device pixel ratio
fn backing_size(canvas: &HtmlCanvasElement) -> (u32, u32) {
    let dpr = web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0);
    let width = (canvas.client_width() as f64 * dpr) as u32;
    let height = (canvas.client_height() as f64 * dpr) as u32;
    (width, height)
}

impl Host for WebHost {
    fn load_texture(&mut self, name: &str) -> Result<TextureHandle, AssetError> {
        let shape = SpriteShape::from_texture_name(name)
            .ok_or_else(|| AssetError::missing(AssetKind::Texture, name))?;
        let id = self.allocate();
        self.textures.insert(id, shape);
        log::debug!("Loaded texture '{name}' as #{id}");
        Ok(TextureHandle(id))
    }

    fn load_sound(&mut self, name: &str) -> Result<SoundHandle, AssetError> {
        let effect = SoundEffect::from_asset_name(name)
            .ok_or_else(|| AssetError::missing(AssetKind::Sound, name))?;
        if !self.audio.is_available() {
            log::warn!("Sound '{name}' loaded without an audio device");
        }
        let id = self.allocate();
        self.sounds.insert(id, effect);
        Ok(SoundHandle(id))
    }

    fn load_music(&mut self, name: &str) -> Result<MusicHandle, AssetError> {
        let track = MusicTrack::from_asset_name(name)
            .ok_or_else(|| AssetError::missing(AssetKind::Music, name))?;
        let id = self.allocate();
        self.music.insert(id, track);
        Ok(MusicHandle(id))
    }

    fn dispose_texture(&mut self, handle: TextureHandle) {
        self.textures.remove(&handle.0);
    }

    fn dispose_sound(&mut self, handle: SoundHandle) {
        self.sounds.remove(&handle.0);
    }

    fn dispose_music(&mut self, handle: MusicHandle) {
        if self.music.remove(&handle.0).is_some() {
            self.audio.stop_music();
        }
    }

    fn play_sound(&mut self, handle: SoundHandle) {
        if let Some(effect) = self.sounds.get(&handle.0) {
            self.audio.play(*effect);
        }
    }

    fn play_music_looped(&mut self, handle: MusicHandle) {
        if let Some(track) = self.music.get(&handle.0) {
            self.audio.start_music(*track);
        }
    }

    fn pause_music(&mut self, handle: MusicHandle) {
        if self.music.contains_key(&handle.0) {
            self.audio.pause_music();
        }
    }

    fn stop_music(&mut self, handle: MusicHandle) {
        if self.music.contains_key(&handle.0) {
            self.audio.stop_music();
        }
    }

    fn poll_pointer(&self) -> Option<Vec2> {
        self.pointer.position()
    }

    fn is_key_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn key_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    fn viewport(&self) -> Vec2 {
        Vec2::new(
            self.canvas.client_width() as f32,
            self.canvas.client_height() as f32,
        )
    }

    fn set_projection(&mut self, combined: &Mat4) {
        self.projection = *combined;
    }

    fn begin_frame(&mut self, clear_color: [f32; 4]) {
        self.sync_canvas_size();
        self.clear_color = clear_color;
        self.vertices.clear();
        self.texts.clear();
    }

    fn draw_sprite(&mut self, texture: TextureHandle, rect: Rect) {
        match self.textures.get(&texture.0) {
            Some(shape) => self.vertices.extend(shape.vertices(rect)),
            None => log::warn!("Draw with unknown texture #{}", texture.0),
        }
    }

    fn draw_text(&mut self, text: &str, pos: Vec2) {
        let percent = self.overlay_percent(pos);
        self.texts.push((text.to_string(), percent));
    }

    fn end_frame(&mut self) {
        match self
            .renderer
            .render(&self.vertices, &self.projection, self.clear_color)
        {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost) => {
                let (w, h) = self.renderer.size;
                self.renderer.resize(w, h);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
        self.overlay.sync(&self.texts);
        self.pressed.clear();
    }

    fn now(&self) -> MonotonicTime {
        let millis = web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0);
        MonotonicTime::from_millis_f64(millis)
    }
}

impl Drop for WebHost {
    fn drop(&mut self) {
        self.overlay.clear();
    }
}
