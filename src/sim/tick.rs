//! Frame loop and interval callbacks
//!
//! One call to [`frame`] per animation frame. The physics world always
//! advances by `SIM_DT`; real elapsed time only feeds the FPS readout.

use super::config::GameMode;
use super::policy;
use super::state::{Session, SessionPhase, SessionResult};
use crate::consts::SIM_DT;
use crate::physics::PostStep;

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutcome {
    /// Set on the frame the session ends
    pub result: Option<SessionResult>,
    /// Balls whose physics objects left the world this frame
    pub removed_balls: usize,
    /// Collision events drained this frame
    pub events: usize,
}

/// Advance the session by one frame
///
/// Order: physics step, collision events, basket, fades, termination.
pub fn frame(session: &mut Session, elapsed_ms: f64) -> FrameOutcome {
    let mut outcome = FrameOutcome::default();
    if !session.is_running() {
        return outcome;
    }

    session.frames += 1;
    if elapsed_ms > 0.0 {
        session.fps = 0.9 * session.fps + 0.1 * (1000.0 / elapsed_ms) as f32;
    }

    let report = session.space.step(SIM_DT);
    for shape in &report.removed_shapes {
        if session.balls.remove_shape(*shape).is_some() {
            outcome.removed_balls += 1;
            log::debug!("Ball shape {:?} removed", shape);
        }
    }

    let contacts = policy::events_from_contacts(&report.contacts, &session.balls);
    session.events.extend(contacts);
    let events = std::mem::take(&mut session.events);
    outcome.events = events.len();
    policy::resolve(events, &mut session.balls, &mut session.score, &mut session.cues);

    move_basket(session);

    for id in session.balls.advance_all() {
        if let Some(record) = session.balls.get(id) {
            session.space.add_post_step(PostStep::RemoveShape(record.shape));
            session.space.add_post_step(PostStep::RemoveBody(record.body));
        }
    }

    if let Some(result) = check_termination(session) {
        session.phase = SessionPhase::Stopped;
        session.result = Some(result);
        outcome.result = Some(result);
        log::info!(
            "Session over: {:?} -> {} after {} frames",
            result.mode,
            result.value,
            session.frames
        );
    }

    outcome
}

/// Move the basket from the paddle controller's state
fn move_basket(session: &mut Session) {
    let Some((start, _)) = session.basket_endpoints() else {
        return;
    };
    let config = &session.config;
    let span = session.paddle.advance(
        start.x,
        config.basket_length,
        config.viewport.width,
        config.pin_radius,
    );
    session.place_basket(span.start);
}

/// The result, if this session has reached its end condition
pub fn check_termination(session: &Session) -> Option<SessionResult> {
    let mode = session.mode();
    let done = match mode {
        GameMode::TimeLimited => session.timer.value() <= 0,
        GameMode::ScoreLimited => session.score.value() >= session.config.score_target,
    };
    done.then(|| SessionResult {
        mode,
        value: match mode {
            GameMode::TimeLimited => session.score.value() as i32,
            GameMode::ScoreLimited => session.timer.value(),
        },
    })
}

/// One-second interval: count the clock down or up
pub fn on_clock_second(session: &mut Session) {
    if !session.is_running() {
        return;
    }
    match session.mode() {
        // Zero is terminal even if no frame has run since it was reached
        GameMode::TimeLimited if session.timer.value() <= 0 => {}
        GameMode::TimeLimited => session.timer.tick_down(),
        GameMode::ScoreLimited => session.timer.tick_up(),
    }
}

/// Two-second interval: drop another ball
pub fn on_spawn_interval(session: &mut Session) {
    if session.is_running() {
        session.spawn_ball();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::config::{Rules, SessionConfig, Viewport};
    use crate::sim::lifecycle::Lifecycle;
    use crate::sim::paddle::Direction;
    use crate::sim::state::SoundCue;

    fn session_with(mode: GameMode, rules: Rules) -> Session {
        let config = SessionConfig::new(mode, Viewport::new(800.0, 600.0), &rules);
        Session::new(config, 12345)
    }

    fn session(mode: GameMode) -> Session {
        session_with(mode, Rules::default())
    }

    #[test]
    fn test_frame_steps_physics() {
        let mut s = session(GameMode::TimeLimited);
        let (id, _) = s.balls.iter().next().unwrap();
        let y0 = s.ball_position(id).unwrap().y;
        for _ in 0..10 {
            frame(&mut s, 16.0);
        }
        assert!(s.ball_position(id).unwrap().y < y0);
        assert_eq!(s.frames, 10);
    }

    #[test]
    fn test_fps_smoothing() {
        let mut s = session(GameMode::TimeLimited);
        frame(&mut s, 0.0);
        assert_eq!(s.fps, 0.0);
        frame(&mut s, 10.0);
        assert!((s.fps - 10.0).abs() < 1e-3);
        frame(&mut s, 10.0);
        assert!((s.fps - 19.0).abs() < 1e-3);
    }

    #[test]
    fn test_basket_idle_without_input() {
        let mut s = session(GameMode::TimeLimited);
        let before = s.basket_endpoints().unwrap();
        for _ in 0..30 {
            frame(&mut s, 16.0);
        }
        assert_eq!(s.basket_endpoints().unwrap(), before);
    }

    #[test]
    fn test_basket_follows_input_and_clamps() {
        let mut s = session(GameMode::TimeLimited);
        s.paddle.press(Direction::Left, 37);
        for _ in 0..200 {
            frame(&mut s, 16.0);
        }
        let (a, b) = s.basket_endpoints().unwrap();
        assert_eq!(a.x, s.config.pin_radius);
        assert_eq!(b.x - a.x, s.config.basket_length);
    }

    #[test]
    fn test_narrow_viewport_basket_stays_inside() {
        let config = SessionConfig::new(GameMode::TimeLimited, Viewport::new(80.0, 600.0), &Rules::default());
        let mut s = Session::new(config, 12345);
        let width = s.config.viewport.width;
        let inset = s.config.pin_radius;

        for direction in [Direction::Right, Direction::Left] {
            s.paddle.press(direction, 0);
            for _ in 0..30 {
                frame(&mut s, 16.0);
                let (a, b) = s.basket_endpoints().unwrap();
                assert!(a.x >= inset, "basket start {} before {}", a.x, inset);
                assert!(b.x <= width - inset, "basket end {} beyond {}", b.x, width - inset);
                assert_eq!(b.x - a.x, s.config.basket_length);
            }
            s.paddle.release(0);
        }
    }

    #[test]
    fn test_countdown_holds_at_zero_without_frames() {
        let rules = Rules {
            time_limit_secs: 1,
            ..Rules::default()
        };
        let mut s = session_with(GameMode::TimeLimited, rules);
        // Intervals keep firing while animation frames are paused
        for _ in 0..5 {
            on_clock_second(&mut s);
        }
        assert_eq!(s.timer.value(), 0);

        let outcome = frame(&mut s, 16.0);
        assert_eq!(outcome.result.map(|r| r.mode), Some(GameMode::TimeLimited));
        assert_eq!(s.timer.value(), 0);
    }

    #[test]
    fn test_time_limit_ends_session() {
        let rules = Rules {
            time_limit_secs: 3,
            ..Rules::default()
        };
        let mut s = session_with(GameMode::TimeLimited, rules);
        for _ in 0..2 {
            on_clock_second(&mut s);
            assert!(frame(&mut s, 16.0).result.is_none());
        }
        on_clock_second(&mut s);
        let outcome = frame(&mut s, 16.0);
        assert_eq!(
            outcome.result,
            Some(SessionResult {
                mode: GameMode::TimeLimited,
                value: s.score.value() as i32,
            })
        );
        assert!(!s.is_running());

        // Nothing moves once stopped
        let frames = s.frames;
        on_clock_second(&mut s);
        frame(&mut s, 16.0);
        assert_eq!(s.frames, frames);
        assert_eq!(s.timer.value(), 0);
    }

    #[test]
    fn test_score_target_ends_session_with_time() {
        let rules = Rules {
            score_target: 2,
            ..Rules::default()
        };
        let mut s = session_with(GameMode::ScoreLimited, rules);
        for _ in 0..7 {
            on_clock_second(&mut s);
        }
        s.score.increment();
        assert!(frame(&mut s, 16.0).result.is_none());
        s.score.increment();
        let outcome = frame(&mut s, 16.0);
        assert_eq!(
            outcome.result,
            Some(SessionResult {
                mode: GameMode::ScoreLimited,
                value: 7,
            })
        );
        assert_eq!(s.result(), outcome.result);
    }

    #[test]
    fn test_spawn_interval_only_while_running() {
        let mut s = session(GameMode::TimeLimited);
        on_spawn_interval(&mut s);
        assert_eq!(s.balls.len(), 2);
        s.stop();
        on_spawn_interval(&mut s);
        assert_eq!(s.balls.len(), 2);
    }

    #[test]
    fn test_caught_ball_is_removed_exactly_once() {
        let mut s = session(GameMode::TimeLimited);
        let (a, b) = s.basket_endpoints().unwrap();
        let x = (a.x + b.x) / 2.0;
        let y = s.config.line_y() + s.config.ball_radius * 3.0;
        let id = s.spawn_ball_at(glam::Vec2::new(x, y));

        // Finish the fade-in before the ball lands
        for _ in 0..60 {
            if s.balls.get(id).is_some_and(|r| r.state == Lifecycle::Active) {
                break;
            }
            s.balls.get_mut(id).unwrap().advance();
        }

        let mut removed = 0;
        for _ in 0..120 {
            removed += frame(&mut s, 16.0).removed_balls;
            if s.balls.get(id).is_none() {
                break;
            }
        }
        assert!(s.balls.get(id).is_none());
        assert!(removed >= 1);
        assert_eq!(s.score.value(), 1);
        assert!(s.take_cues().contains(&SoundCue::Scored));
    }

    #[test]
    fn test_determinism() {
        let mut a = session(GameMode::TimeLimited);
        let mut b = session(GameMode::TimeLimited);
        for i in 0..300 {
            if i % 120 == 0 {
                on_spawn_interval(&mut a);
                on_spawn_interval(&mut b);
            }
            frame(&mut a, 16.0);
            frame(&mut b, 16.0);
        }
        let pa: Vec<_> = a.balls.iter().map(|(id, _)| a.ball_position(id)).collect();
        let pb: Vec<_> = b.balls.iter().map(|(id, _)| b.ball_position(id)).collect();
        assert_eq!(pa, pb);
        assert_eq!(a.score, b.score);
    }
}
