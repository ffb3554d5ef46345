//! Canvas Invaders entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{EventTarget, HtmlCanvasElement};

    use canvas_invaders::Settings;
    use canvas_invaders::audio::{AudioCue, AudioManager};
    use canvas_invaders::consts::CLOCK_INTERVAL_MS;
    use canvas_invaders::platform::web::{add_control, listen, on_keys};
    use canvas_invaders::platform::{
        CANVAS_ID, FIRE_BUTTON_ID, InputState, KeyAction, LEFT_BUTTON_ID, RIGHT_BUTTON_ID,
    };
    use canvas_invaders::renderer::{self, CanvasSurface};
    use canvas_invaders::sim::{GameEvent, GameState, tick, tick_clock};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputState,
        surface: CanvasSurface,
        audio: AudioManager,
        /// A requestAnimationFrame chain is scheduled
        frame_loop_running: bool,
        /// Countdown interval callback, created once
        clock_fn: Option<js_sys::Function>,
        /// Active `setInterval` handle
        clock_handle: Option<i32>,
    }

    impl Game {
        fn new(settings: &Settings, surface: CanvasSurface) -> Self {
            Self {
                state: GameState::new(settings.effective_tuning()),
                input: InputState::default(),
                surface,
                audio: AudioManager::new(settings),
                frame_loop_running: false,
                clock_fn: None,
                clock_handle: None,
            }
        }

        /// Play cues and log what a tick produced
        fn handle_events(&mut self, events: &[GameEvent]) {
            for event in events {
                match event {
                    GameEvent::WaveCleared { level } => log::info!("Level {}", level),
                    GameEvent::GameOver { cause } => {
                        log::info!("Game over ({:?}), score {}", cause, self.state.score)
                    }
                    _ => {}
                }
            }
            for cue in AudioCue::for_events(events) {
                self.audio.handle(cue);
            }
            if self.state.is_over() {
                self.stop_clock();
            }
        }

        /// Any user gesture may unblock audio
        fn gesture(&mut self) {
            let playing = !self.state.is_over();
            self.audio.unlock(playing);
        }

        fn start_clock(&mut self) {
            self.stop_clock();
            if self.state.time_left.is_none() {
                return;
            }
            let Some(clock_fn) = &self.clock_fn else { return };
            let Some(window) = web_sys::window() else { return };
            self.clock_handle = window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    clock_fn,
                    CLOCK_INTERVAL_MS,
                )
                .ok();
        }

        fn stop_clock(&mut self) {
            if let (Some(handle), Some(window)) = (self.clock_handle.take(), web_sys::window()) {
                window.clear_interval_with_handle(handle);
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Canvas Invaders starting...");

        let settings = Settings::load();

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let surface = CanvasSurface::new(&canvas, &settings.assets).expect("no 2d context");
        let game = Rc::new(RefCell::new(Game::new(&settings, surface)));

        setup_clock(game.clone());
        setup_input_handlers(&document, &canvas, game.clone());

        start_session(&game, false);

        log::info!("Canvas Invaders running!");
    }

    /// Begin (or restart) a session: music, countdown, frame loop
    fn start_session(game: &Rc<RefCell<Game>>, restart: bool) {
        let schedule = {
            let mut g = game.borrow_mut();
            let event = if restart {
                g.input.cancel_fire();
                g.state.restart()
            } else {
                GameEvent::Started
            };
            g.handle_events(&[event]);
            g.start_clock();
            log::info!("Session started (level {}, lives {})", g.state.level, g.state.lives);

            let schedule = !g.frame_loop_running;
            g.frame_loop_running = true;
            schedule
        };

        if schedule {
            request_animation_frame(game.clone());
        }
    }

    fn setup_clock(game: Rc<RefCell<Game>>) {
        let weak = Rc::downgrade(&game);
        let closure = Closure::<dyn FnMut()>::new(move || {
            let Some(game) = weak.upgrade() else { return };
            let mut g = game.borrow_mut();
            if let Some(event) = tick_clock(&mut g.state) {
                g.handle_events(&[event]);
            }
        });
        game.borrow_mut().clock_fn = Some(closure.as_ref().unchecked_ref::<js_sys::Function>().clone());
        closure.forget();
    }

    fn setup_input_handlers(
        document: &web_sys::Document,
        canvas: &HtmlCanvasElement,
        game: Rc<RefCell<Game>>,
    ) {
        // Keyboard
        {
            let game = game.clone();
            let target: &EventTarget = document.as_ref();
            on_keys(target, move |key, pressed| {
                let restart = {
                    let mut g = game.borrow_mut();
                    if pressed {
                        g.gesture();
                    }
                    let Some(action) = KeyAction::from_key(key, g.state.is_over()) else {
                        return;
                    };
                    g.input.apply_key(action, pressed)
                };
                if restart {
                    start_session(&game, true);
                }
            });
        }

        // On-screen buttons
        {
            let (press, release) = (game.clone(), game.clone());
            add_control(
                document,
                LEFT_BUTTON_ID,
                move || {
                    let mut g = press.borrow_mut();
                    g.gesture();
                    g.input.set_left(true);
                },
                Some(move || release.borrow_mut().input.set_left(false)),
            );
        }
        {
            let (press, release) = (game.clone(), game.clone());
            add_control(
                document,
                RIGHT_BUTTON_ID,
                move || {
                    let mut g = press.borrow_mut();
                    g.gesture();
                    g.input.set_right(true);
                },
                Some(move || release.borrow_mut().input.set_right(false)),
            );
        }
        {
            let press = game.clone();
            add_control(
                document,
                FIRE_BUTTON_ID,
                move || {
                    let mut g = press.borrow_mut();
                    g.gesture();
                    g.input.fire();
                },
                None::<fn()>,
            );
        }

        // Tap or click on the canvas: unlock audio, restart when over
        for event in ["touchstart", "mousedown"] {
            let game = game.clone();
            let target: &EventTarget = canvas.as_ref();
            listen(target, event, true, move |_: web_sys::Event| {
                let over = {
                    let mut g = game.borrow_mut();
                    g.gesture();
                    g.state.is_over()
                };
                if over {
                    start_session(&game, true);
                }
            });
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();

            let input = g.input.take_tick_input();
            let events = tick(&mut g.state, &input, time);
            g.handle_events(&events);

            let Game { state, surface, .. } = &mut *g;
            renderer::render(surface, state);

            // Over: the result screen is drawn once and the chain stops
            g.frame_loop_running = !g.state.is_over();
            g.frame_loop_running
        };

        if keep_running {
            request_animation_frame(game);
        }
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
    log::info!("Canvas Invaders (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the playable version");

    let settings = canvas_invaders::Settings::load();
    let summary = headless::autoplay(settings.effective_tuning(), 60 * 120);
    println!(
        "Autoplay finished after {} ticks: score {}, level {}, lives {}, over: {}",
        summary.ticks, summary.hud.score, summary.hud.level, summary.hud.lives, summary.over
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drives a session without a browser: a simple pilot chases the lowest
/// enemy and fires when lined up. The countdown advances once per 60 ticks.
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use canvas_invaders::Tuning;
    use canvas_invaders::sim::{GameEvent, GameState, Hud, TickInput, tick, tick_clock};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    pub struct Summary {
        pub ticks: u64,
        pub hud: Hud,
        pub over: bool,
    }

    pub fn autoplay(tuning: Tuning, max_ticks: u64) -> Summary {
        let mut state = GameState::new(tuning);

        for frame in 0..max_ticks {
            let input = pilot(&state);
            let mut events = tick(&mut state, &input, frame as f64 * FRAME_MS);
            if frame % 60 == 59 {
                events.extend(tick_clock(&mut state));
            }

            for event in &events {
                match event {
                    GameEvent::WaveCleared { level } => log::info!("Reached level {}", level),
                    GameEvent::LifeLost { lives_left } => log::info!("Lost a life, {} left", lives_left),
                    GameEvent::GameOver { cause } => log::info!("Game over: {:?}", cause),
                    _ => {}
                }
            }

            if state.is_over() {
                break;
            }
        }

        Summary {
            ticks: state.time_ticks,
            hud: state.hud(),
            over: state.is_over(),
        }
    }

    fn pilot(state: &GameState) -> TickInput {
        let muzzle = state.player.muzzle().x;
        let target = state
            .enemies
            .iter()
            .filter(|e| e.alive)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|e| e.pos.x + e.size.x / 2.0);

        let Some(target) = target else {
            return TickInput::default();
        };

        let dx = target - muzzle;
        TickInput {
            move_left: dx < -state.player.speed,
            move_right: dx > state.player.speed,
            fire: dx.abs() < 15.0,
        }
    }
}
