//! Scene director: start menu, play session and result screen
//!
//! The director owns the one live scene and turns host events (pointer,
//! keys, touches, timers, frames, resizes) into scene changes. It never
//! talks to the browser itself; anything the host must do is returned as a
//! [`HostCommand`] and sounds are queued for [`Director::take_cues`].

use glam::Vec2;

use crate::highscores::HighScores;
use crate::platform::input::KEY_Q;
use crate::platform::{end_buttons, key_direction, start_buttons, touch_zones};
use crate::renderer::draw::{self, Overlay};
use crate::renderer::surface::Surface;
use crate::settings::Settings;
use crate::sim::{self, GameMode, Session, SessionConfig, SessionResult, SoundCue, Viewport};

/// How long the share toast stays up
pub const TOAST_MS: f64 = 2000.0;
pub const SHARE_TOAST: &str = "Use your browser's share menu to share";

/// Something only the host can do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// A session started: schedule the clock and spawn intervals
    StartTimers,
    /// The session is gone: clear both intervals
    StopTimers,
    /// Navigate back in browser history
    HistoryBack,
}

/// The result screen's contents
#[derive(Debug, Clone, PartialEq)]
pub struct ResultScreen {
    pub result: SessionResult,
    pub best: Option<i32>,
    /// Leaderboard rank this run earned, if any
    pub rank: Option<usize>,
    /// Wall-clock time the share toast disappears
    pub toast_until: Option<f64>,
}

#[derive(Debug)]
pub enum Scene {
    Start,
    Playing(Box<Session>),
    End(ResultScreen),
}

impl Scene {
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Start => "start",
            Scene::Playing(_) => "play",
            Scene::End(_) => "end",
        }
    }
}

#[derive(Debug)]
pub struct Director {
    scene: Scene,
    viewport: Viewport,
    pub settings: Settings,
    pub high_scores: HighScores,
    cues: Vec<SoundCue>,
    /// Wall-clock ms of the last frame
    now_ms: f64,
    last_frame_ms: Option<f64>,
    next_seed: u64,
}

impl Director {
    pub fn new(viewport: Viewport, settings: Settings, high_scores: HighScores, seed: u64) -> Self {
        Self {
            scene: Scene::Start,
            viewport,
            settings,
            high_scores,
            cues: Vec::new(),
            now_ms: 0.0,
            last_frame_ms: None,
            next_seed: seed,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The running session, if the play scene is up
    pub fn session(&self) -> Option<&Session> {
        match &self.scene {
            Scene::Playing(session) => Some(&**session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match &mut self.scene {
            Scene::Playing(session) => Some(&mut **session),
            _ => None,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.scene, Scene::Playing(_))
    }

    /// Sounds raised since the last call
    pub fn take_cues(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.cues)
    }

    /// Replace the current scene, tearing the old one down first
    fn switch_to(&mut self, next: Scene) -> Option<HostCommand> {
        let was_playing = match &mut self.scene {
            Scene::Playing(session) => {
                session.stop();
                true
            }
            _ => false,
        };
        log::info!("Scene {} -> {}", self.scene.name(), next.name());
        self.scene = next;
        self.last_frame_ms = None;

        match (was_playing, self.is_playing()) {
            (_, true) => Some(HostCommand::StartTimers),
            (true, false) => Some(HostCommand::StopTimers),
            (false, false) => None,
        }
    }

    /// Start a fresh session in `mode`
    pub fn start_session(&mut self, mode: GameMode) -> Option<HostCommand> {
        let config = SessionConfig::new(mode, self.viewport, &self.settings.rules);
        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(1);
        let mut session = Session::new(config, seed);
        self.cues.extend(session.take_cues());
        self.switch_to(Scene::Playing(Box::new(session)))
    }

    /// Back to the start menu
    pub fn show_menu(&mut self) -> Option<HostCommand> {
        self.switch_to(Scene::Start)
    }

    /// Record the result and show the result screen
    fn finish(&mut self, result: SessionResult) -> Option<HostCommand> {
        let rank = self.high_scores.add_result(&result, self.now_ms);
        if let Some(rank) = rank {
            log::info!("New high score: {} (rank {})", result.value, rank);
            self.high_scores.save();
        }
        let best = self.high_scores.best(result.mode);
        self.cues.push(SoundCue::GameOver);
        self.switch_to(Scene::End(ResultScreen {
            result,
            best,
            rank,
            toast_until: None,
        }))
    }

    /// Mouse button released at a canvas point
    pub fn pointer_up(&mut self, point: Vec2) -> Option<HostCommand> {
        match &mut self.scene {
            Scene::Start => {
                let buttons = start_buttons(self.viewport);
                let mode = if buttons.time_limited.hit(point) {
                    GameMode::TimeLimited
                } else if buttons.score_limited.hit(point) {
                    GameMode::ScoreLimited
                } else {
                    return None;
                };
                self.cues.push(SoundCue::ButtonTouch);
                self.start_session(mode)
            }
            Scene::End(screen) => {
                let buttons = end_buttons(self.viewport);
                if buttons.menu.hit(point) {
                    self.cues.push(SoundCue::ButtonTouch);
                    self.show_menu()
                } else if buttons.share.hit(point) {
                    self.cues.push(SoundCue::ButtonTouch);
                    screen.toast_until = Some(self.now_ms + TOAST_MS);
                    None
                } else if buttons.replay.hit(point) {
                    let mode = screen.result.mode;
                    self.cues.push(SoundCue::ButtonTouch);
                    self.start_session(mode)
                } else {
                    None
                }
            }
            Scene::Playing(_) => None,
        }
    }

    pub fn touch_start(&mut self, point: Vec2) {
        let zones = touch_zones(self.viewport);
        if let (Some(session), Some((direction, key))) = (self.session_mut(), zones.direction_at(point)) {
            session.paddle.press(direction, key);
        }
    }

    /// Touch lifted: releases a steering zone in play, presses buttons elsewhere
    pub fn touch_end(&mut self, point: Vec2) -> Option<HostCommand> {
        if self.is_playing() {
            let zones = touch_zones(self.viewport);
            if let (Some(session), Some((_, key))) = (self.session_mut(), zones.direction_at(point)) {
                session.paddle.release(key);
            }
            None
        } else {
            self.pointer_up(point)
        }
    }

    pub fn key_down(&mut self, code: u32) -> Option<HostCommand> {
        if code == KEY_Q {
            return Some(HostCommand::HistoryBack);
        }
        if let (Some(session), Some(direction)) = (self.session_mut(), key_direction(code)) {
            session.paddle.press(direction, code);
        }
        None
    }

    pub fn key_up(&mut self, code: u32) {
        if let Some(session) = self.session_mut() {
            session.paddle.release(code);
        }
    }

    /// One-second interval
    pub fn clock_second(&mut self) {
        if let Some(session) = self.session_mut() {
            sim::on_clock_second(session);
        }
    }

    /// Two-second interval
    pub fn spawn_interval(&mut self) {
        if let Some(session) = self.session_mut() {
            sim::on_spawn_interval(session);
        }
    }

    /// Animation frame at wall-clock `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> Option<HostCommand> {
        self.now_ms = now_ms;
        let elapsed = self.last_frame_ms.map_or(0.0, |last| now_ms - last);
        self.last_frame_ms = Some(now_ms);

        if let Scene::End(screen) = &mut self.scene {
            if screen.toast_until.is_some_and(|until| now_ms >= until) {
                screen.toast_until = None;
            }
        }

        let Scene::Playing(session) = &mut self.scene else {
            return None;
        };
        let outcome = sim::frame(session, elapsed);
        self.cues.extend(session.take_cues());
        outcome.result.and_then(|result| self.finish(result))
    }

    /// The canvas changed size
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let Some(session) = self.session_mut() {
            sim::resize(session, viewport);
        }
    }

    /// Paint the current scene
    pub fn draw<S: Surface>(&self, surface: &mut S) {
        match &self.scene {
            Scene::Start => draw::draw_start_menu(surface, self.viewport),
            Scene::Playing(session) => {
                let overlay = Overlay {
                    show_fps: self.settings.show_fps,
                    show_touch_zones: self.settings.show_touch_zones,
                };
                draw::draw_session(surface, session, overlay);
            }
            Scene::End(screen) => {
                draw::draw_result(surface, self.viewport, &screen.result, screen.best);
                if screen.toast_until.is_some() {
                    draw::draw_toast(surface, self.viewport, SHARE_TOAST);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::input::{KEY_A, KEY_D};
    use crate::renderer::surface::RecordingSurface;
    use crate::sim::Direction;

    const W: f32 = 800.0;
    const H: f32 = 960.0;

    fn director() -> Director {
        Director::new(Viewport::new(W, H), Settings::default(), HighScores::new(), 11)
    }

    fn center_of(button: &crate::platform::Button) -> Vec2 {
        button.screen_rect().center()
    }

    #[test]
    fn test_start_button_begins_session() {
        let mut d = director();
        let at = center_of(&start_buttons(d.viewport()).score_limited);
        assert_eq!(d.pointer_up(at), Some(HostCommand::StartTimers));
        assert_eq!(d.session().map(|s| s.mode()), Some(GameMode::ScoreLimited));
        let cues = d.take_cues();
        assert!(cues.contains(&SoundCue::ButtonTouch));
        assert!(cues.contains(&SoundCue::GameStart));
    }

    #[test]
    fn test_miss_on_start_menu_does_nothing() {
        let mut d = director();
        assert_eq!(d.pointer_up(Vec2::new(1.0, 1.0)), None);
        assert!(matches!(d.scene(), Scene::Start));
        assert!(d.take_cues().is_empty());
    }

    #[test]
    fn test_keys_steer_only_while_playing() {
        let mut d = director();
        d.key_down(KEY_D);
        d.start_session(GameMode::TimeLimited);
        d.key_down(KEY_A);
        assert_eq!(d.session().unwrap().paddle.direction, Direction::Left);
        // A different key does not release the held one
        d.key_up(KEY_D);
        assert_eq!(d.session().unwrap().paddle.direction, Direction::Left);
        assert!(d.session().unwrap().paddle.moving);
        d.key_up(KEY_A);
        assert!(!d.session().unwrap().paddle.moving);
    }

    #[test]
    fn test_q_goes_back_anywhere() {
        let mut d = director();
        assert_eq!(d.key_down(KEY_Q), Some(HostCommand::HistoryBack));
        d.start_session(GameMode::TimeLimited);
        assert_eq!(d.key_down(KEY_Q), Some(HostCommand::HistoryBack));
    }

    #[test]
    fn test_touch_zones_press_and_release() {
        let mut d = director();
        d.start_session(GameMode::TimeLimited);
        let right = center_of(&touch_zones(d.viewport()).right);
        d.touch_start(right);
        assert_eq!(d.session().unwrap().paddle.direction, Direction::Right);
        assert_eq!(d.touch_end(right), None);
        assert!(!d.session().unwrap().paddle.moving);
    }

    #[test]
    fn test_timeout_shows_result_and_stops_timers() {
        let mut d = director();
        d.start_session(GameMode::TimeLimited);
        for _ in 0..60 {
            d.clock_second();
        }
        assert_eq!(d.frame(16.0), Some(HostCommand::StopTimers));
        let Scene::End(screen) = d.scene() else {
            panic!("expected the result screen");
        };
        assert_eq!(screen.result.mode, GameMode::TimeLimited);
        // Zero points never reach the leaderboard
        assert_eq!(screen.rank, None);
        assert!(d.take_cues().contains(&SoundCue::GameOver));
    }

    #[test]
    fn test_score_limited_result_is_recorded() {
        let mut d = director();
        d.settings.rules.score_target = 1;
        d.start_session(GameMode::ScoreLimited);
        for _ in 0..5 {
            d.clock_second();
        }
        d.session_mut().unwrap().score.increment();
        d.frame(100.0);

        let Scene::End(screen) = d.scene() else {
            panic!("expected the result screen");
        };
        assert_eq!(screen.result.value, 5);
        assert_eq!(screen.rank, Some(1));
        assert_eq!(screen.best, Some(5));
    }

    #[test]
    fn test_end_buttons() {
        let mut d = director();
        d.settings.rules.time_limit_secs = 1;
        d.start_session(GameMode::TimeLimited);
        d.clock_second();
        d.frame(0.0);
        assert!(matches!(d.scene(), Scene::End(_)));

        let buttons = end_buttons(d.viewport());
        assert_eq!(d.pointer_up(center_of(&buttons.share)), None);
        let mut surface = RecordingSurface::new(W, H);
        d.draw(&mut surface);
        assert!(surface.texts().contains(&SHARE_TOAST));

        // The toast expires after two seconds
        d.frame(TOAST_MS + 1.0);
        d.draw(&mut surface);
        assert!(!surface.texts().contains(&SHARE_TOAST));

        assert_eq!(d.pointer_up(center_of(&buttons.replay)), Some(HostCommand::StartTimers));
        assert_eq!(d.session().map(|s| s.mode()), Some(GameMode::TimeLimited));
    }

    #[test]
    fn test_menu_button_returns_to_start() {
        let mut d = director();
        d.settings.rules.time_limit_secs = 1;
        d.start_session(GameMode::TimeLimited);
        d.clock_second();
        d.frame(0.0);
        let menu = center_of(&end_buttons(d.viewport()).menu);
        assert_eq!(d.touch_end(menu), None);
        assert!(matches!(d.scene(), Scene::Start));
    }

    #[test]
    fn test_replacing_a_session_stops_timers_once() {
        let mut d = director();
        d.start_session(GameMode::TimeLimited);
        assert_eq!(d.show_menu(), Some(HostCommand::StopTimers));
        assert_eq!(d.show_menu(), None);
    }

    #[test]
    fn test_resize_reaches_the_session() {
        let mut d = director();
        d.start_session(GameMode::TimeLimited);
        d.resize(Viewport::new(400.0, 480.0));
        assert_eq!(d.session().unwrap().config.viewport.width, 400.0);
        assert_eq!(d.viewport().height, 480.0);
    }
}
