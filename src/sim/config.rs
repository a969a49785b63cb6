//! Session configuration
//!
//! Everything that depends on the viewport is computed once here and passed
//! down explicitly. A resize replaces the whole value.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which condition ends a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Score as much as possible before the clock runs out
    TimeLimited,
    /// Reach the target score as fast as possible
    ScoreLimited,
}

impl GameMode {
    pub fn label(self) -> &'static str {
        match self {
            GameMode::TimeLimited => "Time Limited",
            GameMode::ScoreLimited => "Score Limited",
        }
    }
}

/// Canvas size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Build a viewport, flooring each axis at `MIN_VIEWPORT_DIM`
    pub fn new(width: f32, height: f32) -> Self {
        let clamp = |v: f32| {
            if v.is_finite() && v >= MIN_VIEWPORT_DIM {
                v
            } else {
                MIN_VIEWPORT_DIM
            }
        };
        let viewport = Self {
            width: clamp(width),
            height: clamp(height),
        };
        if viewport.width != width || viewport.height != height {
            log::warn!(
                "Viewport {}x{} is degenerate, clamped to {}x{}",
                width,
                height,
                viewport.width,
                viewport.height
            );
        }
        viewport
    }

    /// Half of the smaller edge; every size in the field scales from it
    pub fn short_edge(&self) -> f32 {
        (self.width / 2.0).min(self.height / 2.0)
    }

    /// Menu layout scale relative to the reference canvas height
    pub fn scale_ratio(&self) -> f32 {
        self.height / REFERENCE_CANVAS_HEIGHT
    }
}

/// Tunable rules, persisted with the settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Starting clock in time-limited mode (seconds)
    pub time_limit_secs: i32,
    /// Points needed in score-limited mode
    pub score_target: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            time_limit_secs: 60,
            score_target: 100,
        }
    }
}

/// Immutable per-session parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub mode: GameMode,
    pub viewport: Viewport,
    pub ball_radius: f32,
    pub pin_radius: f32,
    pub basket_length: f32,
    pub tips_font_size: f32,
    pub basket_velocity_max: f32,
    pub ball_mass: f32,
    pub ball_elasticity: f32,
    pub time_limit_secs: i32,
    pub score_target: u32,
}

impl SessionConfig {
    pub fn new(mode: GameMode, viewport: Viewport, rules: &Rules) -> Self {
        let short = viewport.short_edge();
        let pin_radius = (short * 0.02).floor().max(1.0);
        // Narrow canvases shrink the basket so it still fits between the walls
        let basket_length = (viewport.width * 0.1)
            .floor()
            .max(BASKET_MIN_LENGTH)
            .min(viewport.width - 2.0 * pin_radius)
            .max(1.0);
        Self {
            mode,
            viewport,
            ball_radius: (short * 0.05).floor().max(1.0),
            pin_radius,
            basket_length,
            tips_font_size: (short * 0.1).floor(),
            basket_velocity_max: BASKET_VELOCITY_MAX,
            ball_mass: BALL_MASS,
            ball_elasticity: BALL_ELASTICITY,
            time_limit_secs: rules.time_limit_secs.max(1),
            score_target: rules.score_target.max(1),
        }
    }

    /// Same mode and rules, sized for a new viewport
    pub fn rescaled(&self, viewport: Viewport) -> Self {
        let rules = Rules {
            time_limit_secs: self.time_limit_secs,
            score_target: self.score_target,
        };
        Self::new(self.mode, viewport, &rules)
    }

    /// World y of the divider line and the basket
    pub fn line_y(&self) -> f32 {
        self.viewport.height * 3.0 / 16.0
    }

    /// World y where new balls appear
    pub fn spawn_y(&self) -> f32 {
        self.viewport.height * 8.0 / 9.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_follow_short_edge() {
        let config = SessionConfig::new(
            GameMode::TimeLimited,
            Viewport::new(800.0, 600.0),
            &Rules::default(),
        );
        // short edge = min(400, 300) = 300
        assert_eq!(config.ball_radius, 15.0);
        assert_eq!(config.pin_radius, 6.0);
        assert_eq!(config.tips_font_size, 30.0);
        // 10% of 800 is below the floor
        assert_eq!(config.basket_length, 100.0);
    }

    #[test]
    fn test_wide_viewport_basket() {
        let config = SessionConfig::new(
            GameMode::ScoreLimited,
            Viewport::new(1920.0, 1080.0),
            &Rules::default(),
        );
        assert_eq!(config.basket_length, 192.0);
        assert_eq!(config.score_target, 100);
    }

    #[test]
    fn test_degenerate_viewport_clamped() {
        let viewport = Viewport::new(0.0, f32::NAN);
        assert_eq!(viewport.width, MIN_VIEWPORT_DIM);
        assert_eq!(viewport.height, MIN_VIEWPORT_DIM);

        let config = SessionConfig::new(GameMode::TimeLimited, viewport, &Rules::default());
        assert!(config.ball_radius >= 1.0);
        assert!(config.pin_radius >= 1.0);
    }

    #[test]
    fn test_narrow_viewport_basket_fits() {
        for width in [MIN_VIEWPORT_DIM, 80.0, 104.0] {
            let config = SessionConfig::new(
                GameMode::TimeLimited,
                Viewport::new(width, 600.0),
                &Rules::default(),
            );
            assert!(config.basket_length > 0.0);
            assert!(config.basket_length + 2.0 * config.pin_radius <= width);
        }

        // 80 wide: short edge 40, pin radius floors to 1
        let config = SessionConfig::new(GameMode::TimeLimited, Viewport::new(80.0, 600.0), &Rules::default());
        assert_eq!(config.basket_length, 78.0);

        let shrunk = config.rescaled(Viewport::new(MIN_VIEWPORT_DIM, 600.0));
        assert!(shrunk.basket_length + 2.0 * shrunk.pin_radius <= MIN_VIEWPORT_DIM);
    }

    #[test]
    fn test_rescaled_keeps_mode_and_rules() {
        let rules = Rules {
            time_limit_secs: 30,
            score_target: 5,
        };
        let config = SessionConfig::new(GameMode::ScoreLimited, Viewport::new(800.0, 600.0), &rules);
        let bigger = config.rescaled(Viewport::new(1600.0, 1200.0));
        assert_eq!(bigger.mode, GameMode::ScoreLimited);
        assert_eq!(bigger.time_limit_secs, 30);
        assert_eq!(bigger.score_target, 5);
        assert_eq!(bigger.ball_radius, 30.0);
    }

    #[test]
    fn test_rules_deserialize_with_missing_fields() {
        let rules: Rules = serde_json::from_str(r#"{"score_target": 20}"#).unwrap();
        assert_eq!(rules.score_target, 20);
        assert_eq!(rules.time_limit_secs, 60);
    }
}
