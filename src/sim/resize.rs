//! Rescaling a running session to a new viewport

use glam::Vec2;

use super::config::Viewport;
use super::entities;
use super::state::Session;
use crate::physics::PostStep;

/// Rebuild the static field for `viewport` and scale every ball with it
///
/// Old field shapes are queued for removal after the next step; the new ones
/// exist immediately. The basket keeps its relative horizontal position.
pub fn resize(session: &mut Session, viewport: Viewport) {
    let old = session.config.viewport;
    let scale = Vec2::new(viewport.width / old.width, viewport.height / old.height);

    let start_x = session
        .basket_endpoints()
        .map(|(a, _)| a.x)
        .unwrap_or_else(|| entities::basket_home(&session.config));

    for shape in session.field.all_shapes() {
        session.space.add_post_step(PostStep::RemoveShape(shape));
    }

    session.config = session.config.rescaled(viewport);
    let config = session.config;
    session.field = entities::add_playfield(&mut session.space, &config, start_x * scale.x);

    for (_, body) in session.space.bodies_mut() {
        if !body.is_static() {
            body.pos *= scale;
        }
    }

    log::info!(
        "Resized {}x{} -> {}x{} (scale {:.3}, {:.3})",
        old.width,
        old.height,
        viewport.width,
        viewport.height,
        scale.x,
        scale.y
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::config::{GameMode, Rules, SessionConfig};

    fn session() -> Session {
        let config = SessionConfig::new(GameMode::TimeLimited, Viewport::new(800.0, 600.0), &Rules::default());
        Session::new(config, 1)
    }

    #[test]
    fn test_basket_keeps_relative_position() {
        let mut s = session();
        s.place_basket(200.0);
        resize(&mut s, Viewport::new(1600.0, 900.0));

        let (a, b) = s.basket_endpoints().unwrap();
        assert_eq!(a.x, 400.0);
        assert_eq!(b.x - a.x, s.config.basket_length);
        assert_eq!(a.y, 900.0 * 3.0 / 16.0);
    }

    #[test]
    fn test_balls_scale_per_axis() {
        let mut s = session();
        let id = s.spawn_ball_at(Vec2::new(100.0, 300.0));
        resize(&mut s, Viewport::new(400.0, 1200.0));
        assert_eq!(s.ball_position(id), Some(Vec2::new(50.0, 600.0)));
    }

    #[test]
    fn test_old_field_removed_after_step() {
        let mut s = session();
        let old: Vec<_> = s.field.all_shapes().collect();
        resize(&mut s, Viewport::new(1024.0, 768.0));

        // Still present until the step completes
        assert!(old.iter().all(|h| s.space.contains_shape(*h)));
        let report = s.space.step(SIM_DT);
        assert!(old.iter().all(|h| !s.space.contains_shape(*h)));
        assert_eq!(report.removed_shapes.len(), old.len());
        assert!(s.field.all_shapes().all(|h| s.space.contains_shape(h)));
    }

    #[test]
    fn test_config_follows_viewport() {
        let mut s = session();
        resize(&mut s, Viewport::new(1600.0, 1200.0));
        assert_eq!(s.config.ball_radius, 30.0);
        assert_eq!(s.config.mode, GameMode::TimeLimited);
    }
}
