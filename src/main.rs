//! Easter Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use easter_runner::consts::*;
    use easter_runner::highscores::HighScoreEntry;
    use easter_runner::platform::input::{self, KeyCommand};
    use easter_runner::renderer::{self, HudExtras, HudSlot, RenderState};
    use easter_runner::sim::{self, GameEvent, GameState, TickInput, tick};
    use easter_runner::{HighScores, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        highscores: HighScores,
        render_state: Option<RenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning, width: f32, height: f32) -> Self {
            Self {
                state: GameState::new(seed, tuning, width, height),
                settings: Settings::load(),
                highscores: HighScores::load(),
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(MAX_FRAME_DT);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.clone();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.clear_one_shots();
            }
            if substeps == MAX_SUBSTEPS {
                self.accumulator = 0.0;
            }

            self.handle_events();

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Crashed { score, speed } => {
                        let entry = HighScoreEntry {
                            score: score.max(0.0).floor() as u64,
                            top_speed: speed,
                            eggs_cleared: self.state.obstacles_cleared,
                            timestamp: js_sys::Date::now(),
                        };
                        if let Some(rank) = self.highscores.add_run(entry) {
                            log::info!("New high score, rank {}", rank);
                            self.highscores.save();
                        }
                    }
                    GameEvent::Restarted => log::info!("Run started"),
                    GameEvent::Jumped
                    | GameEvent::ObstacleSpawned { .. }
                    | GameEvent::ObstacleCleared { .. } => {}
                }
            }
        }

        /// Render the current frame and update the HUD
        fn render(&mut self) {
            let extras = HudExtras {
                best: self.highscores.top_score(),
                fps: Some(self.fps),
            };
            let scene = renderer::build(&self.state, &self.settings, extras);

            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&scene) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => render_state.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }

            update_hud(&scene);
        }

        /// Match the canvas backing store and the game viewport to the window
        fn resize(&mut self, canvas: &HtmlCanvasElement, dpr: f64) {
            let client_w = canvas.client_width().max(1);
            let client_h = canvas.client_height().max(1);
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            let logical = (client_w as f32, client_h as f32);
            sim::resize(&mut self.state, logical.0, logical.1);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height, logical);
            }
        }

        fn activate(&mut self) {
            let phase = self.state.phase;
            self.input.activate(phase);
        }
    }

    /// Write scene labels into their DOM slots, hiding the unused ones
    fn update_hud(scene: &renderer::Scene) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for slot in HudSlot::ALL {
            let Some(el) = document.get_element_by_id(slot.element_id()) else {
                continue;
            };
            match scene.label(slot) {
                Some(text) => {
                    if el.text_content().as_deref() != Some(text) {
                        el.set_text_content(Some(text));
                    }
                    let _ = el.set_attribute("class", "hud-item");
                }
                None => {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Easter Runner starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(
            seed,
            Tuning::load(),
            DEFAULT_VIEWPORT_WIDTH,
            DEFAULT_VIEWPORT_HEIGHT,
        )));
        let dpr = window.device_pixel_ratio();
        game.borrow_mut().resize(&canvas, dpr);

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let (width, height) = (canvas.width(), canvas.height());
        let logical = (
            game.borrow().state.viewport.width,
            game.borrow().state.viewport.height,
        );
        let render_state = RenderState::new(surface, &adapter, width, height, logical)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {e}")))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone())?;
        setup_resize_handler(&canvas, game.clone())?;

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);

        log::info!("Easter Runner running!");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if input::is_activate_key(&key) {
                    // Keep Space from scrolling the page
                    event.prevent_default();
                }
                match input::key_command(&key, event.repeat()) {
                    Some(KeyCommand::Activate) => game.borrow_mut().activate(),
                    Some(KeyCommand::Toggle(which)) => {
                        let mut g = game.borrow_mut();
                        let on = g.settings.toggle(which);
                        log::info!("{:?}: {}", which, if on { "on" } else { "off" });
                        g.settings.save();
                    }
                    Some(KeyCommand::ClearHighScores) => {
                        game.borrow_mut().highscores.clear();
                        log::info!("High scores cleared");
                    }
                    None => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                // No focus change or text selection on click
                event.prevent_default();
                game.borrow_mut().activate();
            });
            canvas.add_event_listener_with_callback(
                input::ACTIVATE_POINTER_EVENTS[0],
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                // Suppress the synthetic mouse event and page scroll
                event.prevent_default();
                game.borrow_mut().activate();
            });
            canvas.add_event_listener_with_callback(
                input::ACTIVATE_POINTER_EVENTS[1],
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_resize_handler(
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let dpr = web_sys::window()
                .map(|w| w.device_pixel_ratio())
                .unwrap_or(1.0);
            game.borrow_mut().resize(&canvas, dpr);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Easter Runner (native) starting...");
    log::info!("Rendering needs a browser - run with `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => load_tuning_file(&path),
        None => easter_runner::Tuning::default(),
    };
    headless::run(tuning, 42, 60 * 120);
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning_file(path: &str) -> easter_runner::Tuning {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Could not read tuning file {}: {}", path, e);
            return easter_runner::Tuning::default();
        }
    };
    match easter_runner::Tuning::from_json(&json) {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::error!("Invalid tuning file {}: {}", path, e);
            easter_runner::Tuning::default()
        }
    }
}

/// Autopilot soak run: plays the game without a window and reports each run
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use easter_runner::HighScores;
    use easter_runner::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH};
    use easter_runner::highscores::HighScoreEntry;
    use easter_runner::sim::{GameEvent, GameState, TickInput, tick};
    use easter_runner::tuning::Tuning;

    pub fn run(tuning: Tuning, seed: u64, frames: u64) {
        let mut state = GameState::new(seed, tuning, DEFAULT_VIEWPORT_WIDTH, DEFAULT_VIEWPORT_HEIGHT);
        let mut scores = HighScores::new();
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut jumps = 0u64;

        for frame in 0..frames {
            tick(&mut state, &input);
            for event in state.drain_events() {
                match event {
                    GameEvent::Jumped => jumps += 1,
                    GameEvent::Crashed { score, speed } => {
                        log::info!(
                            "Run over at frame {}: score {}, speed {:.2}, eggs {}",
                            frame,
                            score.floor(),
                            speed,
                            state.obstacles_cleared
                        );
                        scores.add_run(HighScoreEntry {
                            score: score.max(0.0).floor() as u64,
                            top_speed: speed,
                            eggs_cleared: state.obstacles_cleared,
                            timestamp: frame as f64,
                        });
                    }
                    _ => {}
                }
            }
        }

        log::info!(
            "{} frames simulated, {} jumps, best score {}",
            frames,
            jumps,
            scores.top_score().unwrap_or(0)
        );
    }
}
