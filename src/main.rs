//! Flipper Table entry point
//!
//! On the web, forwards DOM key and pointer events to the table and steps it
//! from `requestAnimationFrame`. Natively, plays the table headless in demo
//! mode and logs the scores.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, MouseEvent, TouchEvent};

    use flipper_table::Settings;
    use flipper_table::consts::*;
    use flipper_table::platform::{LocalStore, Zone, key_event, zone_event};
    use flipper_table::settings::KeyBindings;
    use flipper_table::sim::{GameEvent, InputEvent, Table};

    struct Game {
        table: Table,
        bindings: KeyBindings,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        fn update(&mut self, dt: f32) {
            // Clamp to avoid a spiral after a background tab resumes
            self.accumulator += dt.min(0.25);
            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                self.table.tick();
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        fn input(&mut self, input: InputEvent) {
            self.table.handle_input(input);
        }

        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            for event in self.table.drain_events() {
                if let GameEvent::ScoreChanged { current, high } = event {
                    if let Ok(Some(el)) = document.query_selector(".current-score span") {
                        el.set_text_content(Some(&current.to_string()));
                    }
                    if let Ok(Some(el)) = document.query_selector(".high-score span") {
                        el.set_text_content(Some(&high.to_string()));
                    }
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Flipper Table starting...");

        let settings = Settings::load();
        let bindings = settings.key_bindings();
        let table = match Table::new(settings, Box::new(LocalStore)) {
            Ok(table) => table,
            Err(e) => {
                log::error!("Table setup failed: {}", e);
                return;
            }
        };

        let game = Rc::new(RefCell::new(Game {
            table,
            bindings,
            accumulator: 0.0,
            last_time: 0.0,
        }));
        game.borrow_mut().update_hud();

        setup_key_handlers(game.clone());
        setup_trigger_handlers(game.clone());

        request_animation_frame(game);

        log::info!("Flipper Table running!");
    }

    fn setup_key_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        for (name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if let Some(input) = key_event(&g.bindings, &event.key(), pressed) {
                    g.input(input);
                    event.prevent_default();
                    event.stop_propagation();
                }
            });
            let _ = window.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_trigger_handlers(game: Rc<RefCell<Game>>) {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");
        for zone in Zone::ALL {
            let Ok(Some(element)) = document.query_selector(zone.selector()) else {
                log::debug!("No {} element, skipping", zone.selector());
                continue;
            };
            for (name, pressed) in [("mousedown", true), ("mouseup", false)] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                    game.borrow_mut().input(zone_event(zone, pressed));
                    event.stop_propagation();
                });
                let _ = element
                    .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
            for (name, pressed) in [("touchstart", true), ("touchend", false)] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    game.borrow_mut().input(zone_event(zone, pressed));
                    event.prevent_default();
                    event.stop_propagation();
                });
                let _ = element
                    .add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
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
mod headless {
    use std::path::PathBuf;

    use flipper_table::consts::TICK_HZ;
    use flipper_table::platform::JsonFileStore;
    use flipper_table::sim::{GameEvent, Table};
    use flipper_table::{Settings, TableResult};

    const HIGH_SCORE_FILE: &str = "flipper-table-highscore.json";
    const DEFAULT_SECONDS: u64 = 120;

    /// `flipper-table [settings.json] [seconds]`
    pub struct Args {
        pub settings: Option<PathBuf>,
        pub seconds: u64,
    }

    impl Args {
        pub fn parse() -> Self {
            let mut args = Self {
                settings: None,
                seconds: DEFAULT_SECONDS,
            };
            for arg in std::env::args().skip(1) {
                match arg.parse::<u64>() {
                    Ok(seconds) => args.seconds = seconds,
                    Err(_) => args.settings = Some(PathBuf::from(arg)),
                }
            }
            args
        }
    }

    pub fn run(args: Args) -> TableResult<()> {
        let mut settings = match &args.settings {
            Some(path) => Settings::load_from(path)?,
            None => Settings::demo(),
        };
        if !settings.demo_mode {
            log::info!("No player attached, switching to demo mode");
            settings.demo_mode = true;
        }

        let mut table = Table::new(settings, Box::new(JsonFileStore::new(HIGH_SCORE_FILE)))?;
        let ticks = args.seconds * TICK_HZ as u64;
        let mut balls = 0u32;
        let mut last_score = 0u32;

        for _ in 0..ticks {
            table.tick();
            for event in table.drain_events() {
                match event {
                    GameEvent::ScoreChanged { current, high } => {
                        if current > 0 {
                            log::debug!("Score {} (high {})", current, high);
                        }
                        if current == 0 && last_score > 0 {
                            log::info!("Ball {} drained with {} points", balls, last_score);
                        }
                        last_score = current;
                    }
                    GameEvent::BallLaunched { .. } => {}
                    GameEvent::BallReset => balls += 1,
                    GameEvent::BumperLit(_) | GameEvent::BumperDimmed(_) => {}
                }
            }
        }

        let score = table.score();
        log::info!(
            "Played {}s: {} balls, last score {}, high score {}",
            args.seconds,
            balls,
            score.current(),
            score.high()
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flipper Table (headless) starting...");

    match headless::run(headless::Args::parse()) {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Table setup failed: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
