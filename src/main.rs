//! Vector Rocks entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, Window};

    use vector_rocks::audio::{AudioManager, dispatch_events};
    use vector_rocks::consts::NOMINAL_FRAME_MS;
    use vector_rocks::platform::cache::register_service_worker;
    use vector_rocks::platform::{Control, InputSource, InputState};
    use vector_rocks::renderer::{RenderState, scene_vertices};
    use vector_rocks::sim::{GamePhase, GameState, tick};
    use vector_rocks::{Settings, StartupError, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: RenderState,
        audio: AudioManager,
        input: InputState,
        canvas: HtmlCanvasElement,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        /// Advance one display frame
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time) as f32
            } else {
                NOMINAL_FRAME_MS
            };
            self.last_time = time;

            let input = self.input.to_tick_input();
            tick(&mut self.state, &input, dt);
            self.input.clear_one_shots();

            let max_radius = self.state.tuning.asteroid_radius;
            dispatch_events(self.state.events(), &mut self.audio, max_radius);

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % self.frame_times.len();
            let oldest = self.frame_times[self.frame_index];
            if oldest > 0.0 && time > oldest {
                self.fps = (60000.0 / (time - oldest)).round() as u32;
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = scene_vertices(&self.state, &self.settings);
            match self.render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    let (w, h) = self.render_state.size;
                    self.render_state.resize(w, h, self.state.tuning.bounds());
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Match the drawing buffer to the canvas and the field to its CSS size
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (css, pixels) = size_canvas(&window, &self.canvas);
            self.state.resize(css.x, css.y);
            self.render_state
                .resize(pixels.0, pixels.1, self.state.tuning.bounds());
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.score.to_string()));
            }

            if let Some(el) = document.query_selector("#hud-lives .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.ship.lives.to_string()));
            }

            if self.settings.show_fps {
                if let Some(el) = document.get_element_by_id("hud-fps") {
                    let _ = el.set_attribute("class", "hud-item");
                }
                if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }

            set_visible(document, "splash", self.state.phase == GamePhase::Splash);
            let over = self.state.phase == GamePhase::GameOver;
            set_visible(document, "game-over", over);
            if over {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&self.state.score.to_string()));
                }
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let class = if visible { "overlay" } else { "overlay hidden" };
            let _ = el.set_attribute("class", class);
        }
    }

    /// Size the drawing buffer for the device pixel ratio.
    /// Returns the CSS size (field units) and the pixel size.
    fn size_canvas(window: &Window, canvas: &HtmlCanvasElement) -> (Vec2, (u32, u32)) {
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (Vec2::new(client_w as f32, client_h as f32), (width, height))
    }

    /// Read gameplay overrides from `<script type="application/json" id="tuning">`
    fn load_tuning(document: &Document) -> Tuning {
        let text = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Tuning::default();
        }
        match Tuning::from_json(&text) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("Ignoring tuning overrides: {}", err);
                Tuning::default()
            }
        }
    }

    pub async fn run() -> Result<(), StartupError> {
        let window = web_sys::window().ok_or(StartupError::NoWindow)?;
        let document = window.document().ok_or(StartupError::NoDocument)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or(StartupError::MissingElement { id: "canvas" })?
            .dyn_into()
            .map_err(|_| StartupError::NotACanvas { id: "canvas" })?;

        let query = window.location().search().unwrap_or_default();
        let settings = Settings::from_query(&query);
        log::info!("Settings: {:?}", settings);

        let (css, (width, height)) = size_canvas(&window, &canvas);

        // Field follows the canvas's CSS size
        let mut tuning = load_tuning(&document);
        tuning.width = css.x;
        tuning.height = css.y;

        let seed = js_sys::Date::now() as u64;
        let mut state = GameState::new(tuning, seed);
        state.max_particles = settings.max_particles();
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| StartupError::Surface(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| StartupError::NoAdapter(e.to_string()))?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state =
            RenderState::new(surface, &adapter, width, height, state.tuning.bounds()).await?;

        let audio = AudioManager::load(&settings).await;
        let tap_target = canvas.clone();

        let game = Rc::new(RefCell::new(Game {
            state,
            settings,
            render_state,
            audio,
            input: InputState::default(),
            canvas,
            last_time: 0.0,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }));

        setup_keyboard(&window, game.clone());
        setup_controls(&document, game.clone());
        setup_canvas_tap(&tap_target, game.clone());
        setup_focus_loss(&window, game.clone());
        setup_resize(&window, game.clone());

        register_service_worker();

        request_animation_frame(game);

        log::info!("Vector Rocks running!");
        Ok(())
    }

    fn setup_keyboard(window: &Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                if g.input.key_down(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if game.borrow_mut().input.key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Wire the on-screen buttons. Missing buttons leave the keyboard as the
    /// only input path.
    fn setup_controls(document: &Document, game: Rc<RefCell<Game>>) {
        let mut wired = 0;

        for control in Control::ALL {
            let Some(button) = document.get_element_by_id(control.element_id()) else {
                continue;
            };

            {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    g.input.press(InputSource::Pointer, control);
                });
                let _ = button
                    .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
                closure.forget();
            }

            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.release(InputSource::Pointer, control);
            });
            for name in ["pointerup", "pointerleave", "pointercancel"] {
                let _ = button.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            }
            closure.forget();

            wired += 1;
        }

        if wired == 0 {
            log::info!("No on-screen controls found, using keyboard only");
        } else {
            log::info!("Wired {}/{} on-screen controls", wired, Control::ALL.len());
        }
    }

    /// A tap on the playfield starts or restarts the game
    fn setup_canvas_tap(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.audio.resume();
            g.input.press(InputSource::Pointer, Control::Start);
        });
        let _ = canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_focus_loss(window: &Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().input.release_all();
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(window: &Window, game: Rc<RefCell<Game>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            game.borrow_mut().resize();
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
            g.update(time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger init failed: {err}").into());
    }

    log::info!("Vector Rocks starting...");
    if let Err(err) = wasm_game::run().await {
        log::error!("Startup failed: {}", err);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use vector_rocks::Tuning;
    use vector_rocks::headless::run_headless;

    env_logger::init();
    log::info!("Vector Rocks (native) starting...");
    log::info!("The windowed game is web-only - run with `trunk serve`; running the autopilot");

    let mut args = std::env::args().skip(1);
    let frames = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(60 * 60);
    let seed = args.next().and_then(|a| a.parse().ok()).unwrap_or(42);

    let report = run_headless(Tuning::default(), seed, frames);
    println!("{:#?}", report);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
