//! Pinfall entry point
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
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use pinfall::audio::AudioManager;
    use pinfall::consts::{CLOCK_INTERVAL_MS, SPAWN_INTERVAL_MS};
    use pinfall::renderer::CanvasSurface;
    use pinfall::scene::{Director, HostCommand};
    use pinfall::sim::Viewport;
    use pinfall::{HighScores, Settings};

    /// The clock and spawn callbacks, registered once and scheduled per session
    #[derive(Default)]
    struct Intervals {
        clock: Option<js_sys::Function>,
        spawn: Option<js_sys::Function>,
        handles: Vec<i32>,
    }

    struct Game {
        director: Director,
        surface: CanvasSurface,
        audio: AudioManager,
        dpr: f64,
        intervals: Intervals,
    }

    impl Game {
        /// Carry out what the director asked for, then play its sounds
        fn apply(&mut self, command: Option<HostCommand>) {
            match command {
                Some(HostCommand::StartTimers) => {
                    self.stop_timers();
                    self.start_timers();
                }
                Some(HostCommand::StopTimers) => self.stop_timers(),
                Some(HostCommand::HistoryBack) => {
                    if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
                        let _ = history.back();
                    }
                }
                None => {}
            }

            for cue in self.director.take_cues() {
                self.audio.play(cue, &self.director.settings);
            }
        }

        fn start_timers(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let scheduled = [
                (&self.intervals.clock, CLOCK_INTERVAL_MS),
                (&self.intervals.spawn, SPAWN_INTERVAL_MS),
            ];
            for (callback, ms) in scheduled {
                let Some(callback) = callback else { continue };
                match window.set_interval_with_callback_and_timeout_and_arguments_0(callback, ms) {
                    Ok(handle) => self.intervals.handles.push(handle),
                    Err(e) => log::warn!("setInterval failed: {:?}", e),
                }
            }
        }

        fn stop_timers(&mut self) {
            let Some(window) = web_sys::window() else { return };
            for handle in self.intervals.handles.drain(..) {
                window.clear_interval_with_handle(handle);
            }
        }

        /// Canvas pixel position of a CSS-pixel client point
        fn to_canvas(&self, client_x: i32, client_y: i32) -> Vec2 {
            let rect = self.surface.canvas().get_bounding_client_rect();
            Vec2::new(
                ((client_x as f64 - rect.left()) * self.dpr) as f32,
                ((client_y as f64 - rect.top()) * self.dpr) as f32,
            )
        }

        fn resize(&mut self) {
            let (w, h) = self.surface.fit_to_client(self.dpr);
            self.director.resize(Viewport::new(w, h));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pinfall starting...");

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

        let surface = CanvasSurface::new(canvas.clone()).expect("no 2d context");
        let dpr = window.device_pixel_ratio();
        let (width, height) = surface.fit_to_client(dpr);

        let seed = js_sys::Date::now() as u64;
        let director = Director::new(
            Viewport::new(width, height),
            Settings::load(),
            HighScores::load(),
            seed,
        );
        let game = Rc::new(RefCell::new(Game {
            director,
            surface,
            audio: AudioManager::new(),
            dpr,
            intervals: Intervals::default(),
        }));

        log::info!("Canvas {}x{} (dpr {}), seed {}", width, height, dpr, seed);

        setup_intervals(game.clone());
        setup_input_handlers(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Pinfall running!");
    }

    fn setup_intervals(game: Rc<RefCell<Game>>) {
        let clock = {
            let game = game.clone();
            Closure::<dyn FnMut()>::new(move || {
                game.borrow_mut().director.clock_second();
            })
        };
        let spawn = {
            let game = game.clone();
            Closure::<dyn FnMut()>::new(move || {
                game.borrow_mut().director.spawn_interval();
            })
        };

        let mut g = game.borrow_mut();
        g.intervals.clock = Some(clock.as_ref().unchecked_ref::<js_sys::Function>().clone());
        g.intervals.spawn = Some(spawn.as_ref().unchecked_ref::<js_sys::Function>().clone());
        clock.forget();
        spawn.forget();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Mouse up - menu buttons
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                let point = g.to_canvas(event.client_x(), event.client_y());
                let command = g.director.pointer_up(point);
                g.apply(command);
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start - steering zones
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.audio.resume();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        let point = g.to_canvas(touch.client_x(), touch.client_y());
                        g.director.touch_start(point);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end - release steering, or press a menu button
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                let touches = event.changed_touches();
                for i in 0..touches.length() {
                    if let Some(touch) = touches.get(i) {
                        let point = g.to_canvas(touch.client_x(), touch.client_y());
                        let command = g.director.touch_end(point);
                        g.apply(command);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let command = g.director.key_down(event.key_code());
                g.apply(command);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().director.key_up(event.key_code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window resize
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            let command = g.director.frame(js_sys::Date::now());
            g.apply(command);

            let Game {
                director, surface, ..
            } = &mut *g;
            director.draw(surface);
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
    log::info!("Pinfall (native) starting...");
    log::info!("Native mode runs a headless autopilot session - run with `trunk serve` for the web version");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Autopilot play-through on a recording surface
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use pinfall::platform::input::{KEY_LEFT, KEY_RIGHT};
    use pinfall::renderer::RecordingSurface;
    use pinfall::scene::{Director, Scene};
    use pinfall::sim::{GameMode, Session, Viewport};
    use pinfall::{HighScores, Settings};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const WIDTH: f32 = 540.0;
    const HEIGHT: f32 = 960.0;
    /// Ten minutes of play before the autopilot gives up
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    /// Steer the basket under the lowest ball still in play
    fn steer(session: &Session) -> Option<u32> {
        let (a, b) = session.basket_endpoints()?;
        let center = (a.x + b.x) / 2.0;
        let target = session
            .balls
            .iter()
            .filter(|(_, record)| record.is_live())
            .filter_map(|(id, _)| session.ball_position(id))
            .min_by(|p, q| p.y.total_cmp(&q.y))?;

        let dead_zone = session.config.basket_length / 4.0;
        if target.x < center - dead_zone {
            Some(KEY_LEFT)
        } else if target.x > center + dead_zone {
            Some(KEY_RIGHT)
        } else {
            None
        }
    }

    pub fn run() {
        let seed = 0x5eed;
        let mut director = Director::new(
            Viewport::new(WIDTH, HEIGHT),
            Settings::load(),
            HighScores::load(),
            seed,
        );
        let mut surface = RecordingSurface::new(WIDTH, HEIGHT);

        for mode in [GameMode::TimeLimited, GameMode::ScoreLimited] {
            director.start_session(mode);
            let mut held: Option<u32> = None;
            let mut frame = 0u64;

            while director.is_playing() {
                frame += 1;
                if frame > MAX_FRAMES {
                    log::warn!("{} did not finish, returning to the menu", mode.label());
                    director.show_menu();
                    break;
                }
                let wanted = director.session().and_then(steer);
                if wanted != held {
                    if let Some(key) = held {
                        director.key_up(key);
                    }
                    if let Some(key) = wanted {
                        director.key_down(key);
                    }
                    held = wanted;
                }

                if frame % 60 == 0 {
                    director.clock_second();
                }
                if frame % 120 == 0 {
                    director.spawn_interval();
                }

                director.frame(frame as f64 * FRAME_MS);
                director.draw(&mut surface);
                director.take_cues();
            }

            if let Scene::End(screen) = director.scene() {
                log::info!(
                    "{} finished: {} after {} frames (best {:?})",
                    mode.label(),
                    screen.result.value,
                    frame,
                    screen.best
                );
                println!("{}", surface.texts().join(" "));
            }
        }
    }
}
