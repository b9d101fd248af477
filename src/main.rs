//! Duck & Jam entry point
//!
//! Handles platform-specific initialization and runs the game loop. The
//! sim only sees abstract `TickInput` signals; key codes stop here.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use duck_jam::audio::{AudioManager, SoundEffect};
    use duck_jam::renderer::Renderer;
    use duck_jam::sim::{GameEvent, GamePhase, GameState, Side, TickInput, tick};
    use duck_jam::{HighScores, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: TickInput,
        renderer: Option<Renderer>,
        audio: AudioManager,
        highscores: HighScores,
        settings: Settings,
        last_time: f64,
        last_phase: GamePhase,
        new_high_score: bool,
    }

    impl Game {
        fn new(seed: u64, width: f32, height: f32) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);

            Self {
                state: GameState::new(seed, width, height),
                input: TickInput::default(),
                renderer: None,
                audio,
                highscores: HighScores::load(),
                settings,
                last_time: 0.0,
                last_phase: GamePhase::Playing,
                new_high_score: false,
            }
        }

        /// Advance the sim by one frame of wall time
        fn update(&mut self, elapsed_ms: f32) {
            let input = self.input;
            tick(&mut self.state, &input, elapsed_ms);

            // Clear one-shot inputs after processing
            self.input.pause = false;
            self.input.resume = false;
            self.input.reset = false;

            // A fresh run starts with a clean record badge
            if self.last_phase == GamePhase::GameOver && self.state.phase == GamePhase::Playing {
                self.new_high_score = false;
                hide_element("leaderboard-overlay");
            }
            self.last_phase = self.state.phase;

            self.handle_events();
        }

        /// Route drained sim events to audio and the leaderboard
        fn handle_events(&mut self) {
            for event in self.state.take_events() {
                match event {
                    GameEvent::Caught { .. } => self.audio.play(SoundEffect::Catch),
                    GameEvent::Knocked { side } => self.audio.play(match side {
                        Side::Left => SoundEffect::QuackKnock,
                        Side::Right => SoundEffect::GlassKnock,
                    }),
                    GameEvent::RunEnded { score } => {
                        // Read the previous best before writing this run
                        let previous_best = self.highscores.top_score().unwrap_or(0);
                        self.new_high_score = score > 0 && score > previous_best;
                        self.highscores.add_score(score, js_sys::Date::now());
                        self.highscores.save();

                        self.audio.play(SoundEffect::GameOver);
                        if self.new_high_score {
                            self.audio.play(SoundEffect::HighScore);
                        }
                    }
                }
            }
        }

        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                renderer.render(
                    &self.state,
                    self.settings.reduced_motion,
                    self.settings.show_dial,
                );
            }
        }

        /// Update HUD elements in the DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&format!("Score: {}", self.state.score)));
            }

            if let Some(el) = document.get_element_by_id("feedback") {
                match &self.state.feedback {
                    Some(feedback) => {
                        el.set_text_content(Some(feedback.kind.message()));
                        let _ = el.set_attribute(
                            "style",
                            &format!("opacity: {:.2}", feedback.alpha()),
                        );
                    }
                    None => {
                        let _ = el.set_attribute("style", "opacity: 0");
                    }
                }
            }

            set_element_visible(&document, "pause-menu", self.state.phase == GamePhase::Paused);

            let game_over = self.state.phase == GamePhase::GameOver;
            set_element_visible(&document, "game-over", game_over);
            if game_over {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&self.state.score.to_string()));
                }
                set_element_visible(&document, "highscore-badge", self.new_high_score);
            }
        }

        /// Fill and show the leaderboard overlay
        fn show_leaderboard(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            if let Some(list) = document.get_element_by_id("leaderboard-list") {
                let rows: String = self
                    .highscores
                    .entries
                    .iter()
                    .enumerate()
                    .map(|(i, entry)| format!("<li>{}. {}</li>", i + 1, entry.score))
                    .collect();
                list.set_inner_html(&rows);
            }
            set_element_visible(&document, "leaderboard-overlay", true);
        }
    }

    fn set_element_visible(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    fn hide_element(id: &str) {
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            set_element_visible(&document, id, false);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Duck & Jam starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let width = canvas.client_width().max(1) as u32;
        let height = canvas.client_height().max(1) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(seed, width as f32, height as f32);
        game.renderer = Renderer::new(&canvas);
        if game.renderer.is_none() {
            log::error!("Failed to acquire 2d canvas context");
        }
        let game = Rc::new(RefCell::new(game));

        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Duck & Jam running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key presses: held movement keys plus one-shot signals
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" | "h" | "H" => g.input.move_left = true,
                    "ArrowRight" | "d" | "D" => g.input.move_right = true,
                    "Escape" | "q" | "Q" => g.input.pause = true,
                    " " | "Enter" => {
                        if g.state.phase == GamePhase::GameOver {
                            g.input.reset = true;
                        } else {
                            g.input.resume = true;
                        }
                    }
                    "r" | "R" => {
                        if g.state.phase == GamePhase::GameOver {
                            g.input.reset = true;
                        }
                    }
                    "l" | "L" => {
                        if g.state.phase == GamePhase::GameOver {
                            g.show_leaderboard();
                        } else {
                            g.input.move_right = true;
                        }
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key releases clear held movement
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" | "h" | "H" => g.input.move_left = false,
                    "ArrowRight" | "d" | "D" | "l" | "L" => g.input.move_right = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.settings.pause_on_blur && g.state.phase == GamePhase::Playing {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.pause_on_blur && g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let elapsed_ms = if g.last_time > 0.0 {
                (time - g.last_time) as f32
            } else {
                duck_jam::consts::REFERENCE_FRAME_MS
            };
            g.last_time = time;

            g.update(elapsed_ms);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Duck & Jam (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    smoke_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless sanity run: ten simulated seconds on a fixed seed
#[cfg(not(target_arch = "wasm32"))]
fn smoke_run() {
    use duck_jam::consts::{GAME_HEIGHT, GAME_WIDTH, REFERENCE_FRAME_MS};
    use duck_jam::sim::{GameState, TickInput, tick};

    let mut state = GameState::new(4242, GAME_WIDTH, GAME_HEIGHT);
    let input = TickInput::default();
    for _ in 0..600 {
        tick(&mut state, &input, REFERENCE_FRAME_MS);
    }

    println!(
        "10s simulated: score {}, {} falling, {} stacked, {} debris, phase {:?}",
        state.score,
        state.falling.len(),
        state.stacks.total_len(),
        state.debris.len(),
        state.phase
    );
}
