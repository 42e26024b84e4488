//! Raindrop entry point
//!
//! The browser build drives a `WebHost` from `requestAnimationFrame`. The
//! native build has no window: it plays a scripted session against a
//! `HeadlessHost` and logs the outcome.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use raindrop::platform::{Key, WebHost};
    use raindrop::{Game, Settings};

    /// Longest frame delta fed to the game (seconds)
    const MAX_FRAME_DT: f32 = 0.1;

    /// Everything the event handlers and the frame loop share
    struct App {
        host: WebHost,
        /// `None` once the page is being torn down
        game: Option<Game>,
        last_time: f64,
    }

    impl App {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;

            if let Some(game) = self.game.as_mut() {
                game.step(&mut self.host, dt.clamp(0.0, MAX_FRAME_DT));
            }
        }

        fn shutdown(&mut self) {
            if let Some(game) = self.game.take() {
                game.shutdown(&mut self.host);
            }
        }
    }

    /// Replace the loading indicator with an error message
    fn show_fatal(message: &str) {
        log::error!("{message}");
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(loading) = document.get_element_by_id("loading") {
            loading.set_text_content(Some(message));
            let _ = loading.set_attribute("class", "error");
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Raindrop starting...");

        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        let settings = Settings::load();
        settings.save();

        // Fresh drop pattern every visit unless a seed is pinned
        let mut session = settings.clone();
        session.seed.get_or_insert(js_sys::Date::now() as u64);

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            show_fatal("No <canvas id=\"canvas\"> on the page");
            return;
        };

        let mut host = match WebHost::new(canvas.clone(), &session).await {
            Ok(host) => host,
            Err(e) => {
                show_fatal(&format!("Graphics unavailable: {e}"));
                return;
            }
        };

        let game = match Game::init(&mut host, &session) {
            Ok(game) => game,
            Err(e) => {
                show_fatal(&format!("Failed to load assets: {e}"));
                return;
            }
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let app = Rc::new(RefCell::new(App {
            host,
            game: Some(game),
            last_time: 0.0,
        }));

        setup_input_handlers(&canvas, app.clone());
        setup_visibility(app.clone(), session.auto_pause);
        setup_unload(app.clone());

        request_animation_frame(app);

        log::info!("Raindrop running!");
    }

    /// Mouse/touch position relative to the canvas, in CSS pixels
    fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(
            client_x as f32 - rect.left() as f32,
            client_y as f32 - rect.top() as f32,
        )
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Mouse down
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                app.borrow_mut().host.pointer_down(pos);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move (only tracked while a button is down)
        {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                app.borrow_mut().host.pointer_move(pos);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse up anywhere
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().host.pointer_up();
            });
            let _ = window
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start / move
        for event_name in ["touchstart", "touchmove"] {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let pos = canvas_point(&canvas_clone, touch.client_x(), touch.client_y());
                    let mut a = app.borrow_mut();
                    if event.type_() == "touchstart" {
                        a.host.pointer_down(pos);
                    } else {
                        a.host.pointer_move(pos);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end / cancel: follow any finger still down
        for event_name in ["touchend", "touchcancel"] {
            let app = app.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let remaining = event
                    .touches()
                    .get(0)
                    .map(|touch| canvas_point(&canvas_clone, touch.client_x(), touch.client_y()));
                app.borrow_mut().host.touch_ended(remaining);
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom_key(&event.key()) {
                    event.prevent_default();
                    app.borrow_mut().host.key_down(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = Key::from_dom_key(&event.key()) {
                    app.borrow_mut().host.key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Hide/show follow tab visibility. With `auto_pause`, hiding the tab or
    /// blurring the window also pauses play.
    fn setup_visibility(app: Rc<RefCell<App>>, auto_pause: bool) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut a = app.borrow_mut();
                let App { host, game, .. } = &mut *a;
                let Some(game) = game.as_mut() else { return };
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    host.release_all();
                    if auto_pause && game.pause(host) {
                        log::info!("Auto-paused (tab hidden)");
                    }
                    game.hide(host);
                } else {
                    game.show(host);
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        if !auto_pause {
            return;
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut a = app.borrow_mut();
                let App { host, game, .. } = &mut *a;
                host.release_all();
                if let Some(game) = game.as_mut() {
                    if game.pause(host) {
                        log::info!("Auto-paused (window blur)");
                    }
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Release assets once when the page goes away
    fn setup_unload(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().shutdown();
        });
        let _ =
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.frame(time);
            if a.game.is_none() {
                return;
            }
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use anyhow::Context;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Raindrop (native) starting...");
    log::info!("No window on native - run with `trunk serve` for the playable web version");

    let settings = raindrop::Settings::load().context("Failed to load settings")?;
    autoplay::run(&settings, autoplay::DEMO_SECS)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless demo: a scripted player chases the lowest drop with the pointer
#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use anyhow::Context;

    use raindrop::platform::{HeadlessHost, Key};
    use raindrop::sim::GameEvent;
    use raindrop::{Game, Settings};

    pub const DEMO_SECS: f32 = 30.0;
    const FRAME_DT: f32 = 1.0 / 60.0;

    pub fn run(settings: &Settings, seconds: f32) -> anyhow::Result<()> {
        let mut host = HeadlessHost::new();
        let mut game = Game::init(&mut host, settings).context("Failed to load assets")?;

        host.tap_key(Key::Start);

        let frames = (seconds / FRAME_DT).round() as u64;
        let (mut collected, mut missed) = (0u32, 0u32);

        for _ in 0..frames {
            host.advance(FRAME_DT);

            // Follow the drop closest to the ground
            let target = game
                .state()
                .raindrops
                .iter()
                .min_by(|a, b| a.rect.bottom().total_cmp(&b.rect.bottom()))
                .map(|raindrop| game.camera().to_screen(raindrop.rect.center()));
            host.set_pointer(target);

            let frame = game.step(&mut host, FRAME_DT);
            for event in &frame.events {
                match event {
                    GameEvent::Collected { .. } => collected += 1,
                    GameEvent::Missed => missed += 1,
                    _ => {}
                }
            }
        }

        log::info!(
            "Autoplay finished after {:.0}s: {} collected, {} missed, {} sounds played",
            seconds,
            collected,
            missed,
            host.sounds_played.len()
        );
        println!("{}", raindrop::score_text(game.state().score));

        game.shutdown(&mut host);
        if host.live_assets() != 0 {
            anyhow::bail!("{} assets leaked", host.live_assets());
        }
        Ok(())
    }
}
