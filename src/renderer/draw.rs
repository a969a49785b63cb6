//! Scene drawing on top of a [`Surface`]

use glam::Vec2;

use super::surface::{Surface, TextAlign};
use crate::physics::{CollisionCategory, Geometry};
use crate::platform::{Button, Rect, end_buttons, start_buttons, touch_zones};
use crate::sim::entities::{HIGHLIGHT_COLOR, TEXT_COLOR, field_style};
use crate::sim::{Color, GameMode, Session, SessionResult, Viewport};
use crate::world_to_canvas;

const WHITE: Color = Color::rgb(255, 255, 255);
const TOAST_BG: Color = Color::rgba(50, 50, 50, 0.9);

/// Optional HUD layers
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay {
    pub show_fps: bool,
    pub show_touch_zones: bool,
}

/// Draw every shape, then score, clock and overlays
pub fn draw_session<S: Surface>(surface: &mut S, session: &Session, overlay: Overlay) {
    surface.clear();
    let h = session.config.viewport.height;

    for (handle, shape) in session.space.shapes() {
        let color = if shape.category == CollisionCategory::Ball {
            session
                .balls
                .id_for_shape(handle)
                .and_then(|id| session.balls.get(id))
                .map(|record| record.color)
        } else {
            field_style(shape.category)
        };
        let (Some(color), Some(geometry)) = (color, session.space.world_geometry(handle)) else {
            continue;
        };
        match geometry {
            Geometry::Circle { offset, radius } => {
                surface.fill_circle(world_to_canvas(offset, h), radius, color);
            }
            Geometry::Segment { a, b, radius } => {
                surface.stroke_line(
                    world_to_canvas(a, h),
                    world_to_canvas(b, h),
                    (radius * 2.0).max(1.0),
                    color,
                );
            }
        }
    }

    draw_hud(surface, session);

    if overlay.show_touch_zones {
        let zones = touch_zones(session.config.viewport);
        for zone in [&zones.left, &zones.right] {
            surface.fill_rect(zone.screen_rect(), zone.color);
        }
    }

    if overlay.show_fps {
        surface.fill_text(
            &format!("FPS: {:.0}", session.fps),
            Vec2::new(8.0, 16.0),
            16.0,
            TextAlign::Left,
            TEXT_COLOR,
        );
    }
}

/// Score in the middle, clock on the right, both near the bottom
fn draw_hud<S: Surface>(surface: &mut S, session: &Session) {
    let config = &session.config;
    let font = config.tips_font_size;
    let w = config.viewport.width;
    let y = config.viewport.height / 16.0 * 15.0 - font / 2.0;

    let score = session.score.value();
    let score_color = if config.mode == GameMode::ScoreLimited && score >= config.score_target {
        HIGHLIGHT_COLOR
    } else {
        TEXT_COLOR
    };
    surface.fill_text(
        &score.to_string(),
        Vec2::new(w / 2.0, y),
        font,
        TextAlign::Center,
        score_color,
    );

    let time = session.timer.value();
    let time_color = if config.mode == GameMode::TimeLimited && time <= 0 {
        HIGHLIGHT_COLOR
    } else {
        TEXT_COLOR
    };
    surface.fill_text(
        &format!("{}s", time),
        Vec2::new(w - font, y),
        font,
        TextAlign::Right,
        time_color,
    );
}

fn draw_button<S: Surface>(surface: &mut S, button: &Button) {
    let rect = button.screen_rect();
    surface.fill_rect(rect, button.color);
    surface.fill_text(
        button.label,
        rect.center(),
        48.0 * button.scale_ratio,
        TextAlign::Center,
        WHITE,
    );
}

/// Title and the two mode buttons
pub fn draw_start_menu<S: Surface>(surface: &mut S, viewport: Viewport) {
    surface.clear();
    let ratio = viewport.scale_ratio();
    surface.fill_text(
        "Pinfall",
        Vec2::new(viewport.width / 2.0, viewport.height * 0.2),
        120.0 * ratio,
        TextAlign::Center,
        TEXT_COLOR,
    );

    let buttons = start_buttons(viewport);
    draw_button(surface, &buttons.time_limited);
    draw_button(surface, &buttons.score_limited);
}

/// The three result lines for a finished session
pub fn result_lines(result: &SessionResult) -> [String; 3] {
    let (before, after) = match result.mode {
        GameMode::TimeLimited => ("You Got", "Points"),
        GameMode::ScoreLimited => ("You Spent", "Seconds"),
    };
    [before.to_string(), result.value.to_string(), after.to_string()]
}

/// Result text, best so far, and the menu/share/replay buttons
pub fn draw_result<S: Surface>(surface: &mut S, viewport: Viewport, result: &SessionResult, best: Option<i32>) {
    surface.clear();
    let ratio = viewport.scale_ratio();
    let cx = viewport.width / 2.0;
    // Reference layout: lines centered on a quarter of the height, 120 apart
    let cy = viewport.height / 4.0;

    for (i, line) in result_lines(result).iter().enumerate() {
        let dy = (i as f32 - 1.0) * 120.0 * ratio;
        surface.fill_text(line, Vec2::new(cx, cy + dy), 90.0 * ratio, TextAlign::Center, TEXT_COLOR);
    }

    if let Some(best) = best {
        surface.fill_text(
            &format!("Best: {}", best),
            Vec2::new(cx, cy + 200.0 * ratio),
            40.0 * ratio,
            TextAlign::Center,
            TEXT_COLOR,
        );
    }

    let buttons = end_buttons(viewport);
    draw_button(surface, &buttons.menu);
    draw_button(surface, &buttons.share);
    draw_button(surface, &buttons.replay);
}

/// Short message banner near the bottom
pub fn draw_toast<S: Surface>(surface: &mut S, viewport: Viewport, text: &str) {
    let ratio = viewport.scale_ratio();
    let w = 600.0 * ratio;
    let h = 80.0 * ratio;
    let rect = Rect::new((viewport.width - w) / 2.0, viewport.height - h * 2.0, w, h);
    surface.fill_rect(rect, TOAST_BG);
    surface.fill_text(text, rect.center(), 28.0 * ratio, TextAlign::Center, WHITE);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::surface::{DrawCommand, RecordingSurface};
    use crate::sim::{Rules, SessionConfig};

    fn session(mode: GameMode) -> Session {
        let config = SessionConfig::new(mode, Viewport::new(800.0, 600.0), &Rules::default());
        Session::new(config, 3)
    }

    #[test]
    fn test_session_draws_pins_ball_and_hud() {
        let s = session(GameMode::TimeLimited);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        draw_session(&mut surface, &s, Overlay::default());

        assert_eq!(surface.commands[0], DrawCommand::Clear);
        // Every pin plus the one ball
        assert_eq!(surface.circles(), s.field.pins.len() + 1);
        assert_eq!(surface.texts(), vec!["0", "60s"]);
    }

    #[test]
    fn test_walls_are_not_drawn() {
        let s = session(GameMode::TimeLimited);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        draw_session(&mut surface, &s, Overlay::default());

        let lines = surface
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        // Divider line and basket only
        assert_eq!(lines, 2);
    }

    #[test]
    fn test_ball_drawn_in_canvas_space() {
        let mut s = session(GameMode::TimeLimited);
        let id = s.spawn_ball_at(Vec2::new(100.0, 500.0));
        let mut surface = RecordingSurface::new(800.0, 600.0);
        draw_session(&mut surface, &s, Overlay::default());

        let alpha = s.balls.get(id).unwrap().alpha();
        assert!(surface.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Circle { center, color, .. }
                if *center == Vec2::new(100.0, 100.0) && color.a == alpha
        )));
    }

    #[test]
    fn test_overlays() {
        let s = session(GameMode::ScoreLimited);
        let mut surface = RecordingSurface::new(800.0, 600.0);
        draw_session(
            &mut surface,
            &s,
            Overlay {
                show_fps: true,
                show_touch_zones: true,
            },
        );
        assert!(surface.texts().iter().any(|t| t.starts_with("FPS")));
        let rects = surface
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { .. }))
            .count();
        assert_eq!(rects, 2);
    }

    #[test]
    fn test_result_text() {
        let result = SessionResult {
            mode: GameMode::ScoreLimited,
            value: 42,
        };
        let mut surface = RecordingSurface::new(800.0, 960.0);
        draw_result(&mut surface, Viewport::new(800.0, 960.0), &result, Some(30));
        let texts = surface.texts();
        assert_eq!(&texts[..3], &["You Spent", "42", "Seconds"]);
        assert!(texts.contains(&"Best: 30"));
        assert!(texts.contains(&"Replay"));
    }

    #[test]
    fn test_start_menu_labels() {
        let mut surface = RecordingSurface::new(800.0, 960.0);
        draw_start_menu(&mut surface, Viewport::new(800.0, 960.0));
        let texts = surface.texts();
        assert!(texts.contains(&"Time Limited"));
        assert!(texts.contains(&"Score Limited"));
    }
}
