//! Argenoid entry point
//!
//! Wires the browser page to the simulation on wasm; natively runs a
//! headless autopilot demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use rand_pcg::Pcg32;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use argenoid::audio::AudioManager;
    use argenoid::platform::{Key, KeyAction, key_action, pointer_to_field_x};
    use argenoid::renderer::{CanvasRenderer, compose};
    use argenoid::sim::{self, GameEvent, GamePhase, GameState, Field, TickInput};
    use argenoid::ui::{Hud, Overlay, OverlayAction};
    use argenoid::{FrameClock, GameConfig};

    /// Vertical space reserved for the page header
    const HEADER_HEIGHT: i32 = 80;
    const FLASH_CLASS: &str = "paddle-flash";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        clock: FrameClock,
        input: TickInput,
        rng: Pcg32,
        renderer: CanvasRenderer,
        audio: AudioManager,
        canvas: HtmlCanvasElement,
        document: Document,
        // Last values written to the DOM
        hud: Option<Hud>,
        overlay: Option<Option<Overlay>>,
    }

    impl Game {
        /// Run owed simulation steps and react to their events
        fn update(&mut self, time: f64) {
            let events = self
                .clock
                .advance(&mut self.state, &mut self.input, time, &mut self.rng);
            for event in events {
                match event {
                    GameEvent::Sound(effect) => self.audio.play(effect),
                    GameEvent::PaddleFlash => {
                        self.canvas.class_list().add_1(FLASH_CLASS).ok();
                    }
                    GameEvent::Started { .. } => self.audio.resume(),
                    _ => {}
                }
            }
            if !self.state.paddle.is_flashing() {
                self.canvas.class_list().remove_1(FLASH_CLASS).ok();
            }
        }

        fn render(&self) {
            if let Err(e) = self.renderer.draw(&compose(&self.state)) {
                log::warn!("Render error: {:?}", e);
            }
        }

        /// Update HUD and overlay elements in DOM
        fn update_dom(&mut self) {
            let hud = Hud::from_state(&self.state);
            if self.hud != Some(hud) {
                if let Some(el) = self.document.get_element_by_id("score") {
                    el.set_text_content(Some(&hud.score.to_string()));
                }
                if let Some(el) = self.document.get_element_by_id("lives") {
                    el.set_text_content(Some(&hud.lives.to_string()));
                }
                self.hud = Some(hud);
            }

            let overlay = Overlay::for_state(&self.state);
            if self.overlay.as_ref() == Some(&overlay) {
                return;
            }
            if let Some(content) = &overlay {
                if let Some(el) = self.document.get_element_by_id("overlay-title") {
                    el.set_text_content(Some(content.title));
                }
                if let Some(el) = self.document.get_element_by_id("overlay-message") {
                    el.set_text_content(Some(&content.message));
                }
                if let Some(el) = self.document.get_element_by_id("start-btn") {
                    el.set_text_content(Some(content.button));
                }
            }
            if let Some(el) = self.document.get_element_by_id("overlay") {
                el.class_list()
                    .toggle_with_force("hidden", overlay.is_none())
                    .ok();
            }
            self.overlay = Some(overlay);
        }

        /// Fit the canvas to its container and re-seat the field
        fn resize(&mut self) {
            let Some(container) = self.canvas.parent_element() else {
                return;
            };
            let width = container.client_width().max(0);
            let height = (container.client_height() - HEADER_HEIGHT).max(0);
            self.canvas.set_width(width as u32);
            self.canvas.set_height(height as u32);
            sim::resize(&mut self.state, width as f32, height as f32);
        }

        fn overlay_clicked(&mut self) {
            self.audio.resume();
            match Overlay::for_state(&self.state).map(|o| o.action) {
                Some(OverlayAction::Start) => self.input.start = true,
                Some(OverlayAction::Resume) => self.input.pause = true,
                None => {}
            }
        }

        fn pointer_moved(&mut self, client_x: f32) {
            let rect = self.canvas.get_bounding_client_rect();
            if let Some(x) = pointer_to_field_x(
                client_x,
                rect.left() as f32,
                rect.width() as f32,
                self.canvas.width() as f32,
            ) {
                self.input.target_x = Some(x);
            }
        }
    }

    /// Optional JSON tuning on the canvas `data-config` attribute
    fn load_config(canvas: &HtmlCanvasElement) -> GameConfig {
        let Some(json) = canvas.get_attribute("data-config") else {
            return GameConfig::default();
        };
        match GameConfig::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded config from data-config");
                config
            }
            Err(e) => {
                log::warn!("Ignoring data-config: {}", e);
                GameConfig::default()
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Argenoid starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let config = load_config(&canvas);
        let seed = js_sys::Date::now() as u64;
        let renderer = CanvasRenderer::new(&canvas)?;
        let field = Field::new(canvas.width() as f32, canvas.height() as f32);

        let game = Rc::new(RefCell::new(Game {
            state: GameState::new(config, field),
            clock: FrameClock::new(),
            input: TickInput::default(),
            rng: sim::seeded(seed),
            renderer,
            audio: AudioManager::new(),
            canvas: canvas.clone(),
            document: document.clone(),
            hud: None,
            overlay: None,
        }));
        game.borrow_mut().resize();

        log::info!("Game initialized with seed: {}", seed);

        setup_resize(game.clone())?;
        setup_input_handlers(&canvas, game.clone())?;
        setup_start_button(&document, game.clone())?;
        setup_auto_pause(&document, game.clone())?;

        request_animation_frame(game);

        log::info!("Argenoid running!");
        Ok(())
    }

    fn setup_resize(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Mouse move anywhere on the page
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().pointer_moved(event.client_x() as f32);
            });
            window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move on the canvas, without scrolling the page
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    game.borrow_mut().pointer_moved(touch.client_x() as f32);
                }
            });
            canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match key_action(&event.key()) {
                    KeyAction::Press(Key::Start) => g.overlay_clicked(),
                    KeyAction::Press(Key::Pause) => g.input.pause = true,
                    KeyAction::Press(Key::Autopilot) => {
                        g.input.autopilot = !g.input.autopilot;
                        log::info!("Autopilot: {}", g.input.autopilot);
                    }
                    KeyAction::Ignore => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_start_button(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let Some(btn) = document.get_element_by_id("start-btn") else {
            log::warn!("No #start-btn element; keyboard only");
            return Ok(());
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            game.borrow_mut().overlay_clicked();
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        if let Err(e) = window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            log::warn!("requestAnimationFrame failed: {:?}", e);
        }
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_dom();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Argenoid (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - serve the wasm build to play");

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => 42,
    };
    let frames = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => 60 * 60 * 5,
    };
    let config = match args.next() {
        Some(json) => argenoid::GameConfig::from_json(&json)?,
        None => argenoid::GameConfig::default(),
    };

    demo::run(config, seed, frames);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use argenoid::sim::{self, Field, GameEvent, GameState, TickInput};
    use argenoid::{FrameClock, GameConfig};

    const FIELD: Field = Field {
        width: 800.0,
        height: 600.0,
    };
    /// Synthetic display frame interval (60 Hz)
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Play with the autopilot until the run ends or `frames` elapse
    pub fn run(config: GameConfig, seed: u64, frames: u64) {
        let mut state = GameState::new(config, FIELD);
        let mut rng = sim::seeded(seed);
        let mut clock = FrameClock::new();
        let mut input = TickInput {
            start: true,
            autopilot: true,
            ..Default::default()
        };

        let mut pickups = 0;
        for frame in 0..frames {
            let events = clock.advance(&mut state, &mut input, frame as f64 * FRAME_MS, &mut rng);
            for event in events {
                match event {
                    GameEvent::PowerUpCollected(kind) => {
                        pickups += 1;
                        log::info!("Frame {}: collected {}", frame, kind.name());
                    }
                    GameEvent::BallLost { lives_left } => {
                        log::info!("Frame {}: ball lost, {} lives left", frame, lives_left);
                    }
                    GameEvent::GameOver { score } | GameEvent::Won { score } => {
                        log::info!(
                            "Frame {}: run ended ({:?}) with {} points, {} pickups",
                            frame,
                            state.phase,
                            score,
                            pickups
                        );
                        return;
                    }
                    _ => {}
                }
            }
        }

        log::info!(
            "Stopped after {} frames: {} points, {} lives, {} bricks left, {} pickups",
            frames,
            state.score,
            state.lives,
            state.bricks_remaining(),
            pickups
        );
    }
}
