//! Best results per game mode
//!
//! Persisted to LocalStorage, keeps the top 10 of each mode. Time-limited
//! runs rank by points (higher is better), score-limited runs by seconds
//! (lower is better).

use serde::{Deserialize, Serialize};

use crate::sim::{GameMode, SessionResult};

/// Maximum number of entries kept per mode
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Points (time-limited) or seconds (score-limited)
    pub value: i32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HighScores {
    pub time_limited: Vec<HighScoreEntry>,
    pub score_limited: Vec<HighScoreEntry>,
}

/// True if `a` ranks above `b` in `mode`
fn beats(mode: GameMode, a: i32, b: i32) -> bool {
    match mode {
        GameMode::TimeLimited => a > b,
        GameMode::ScoreLimited => a < b,
    }
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "pinfall_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self, mode: GameMode) -> &[HighScoreEntry] {
        match mode {
            GameMode::TimeLimited => &self.time_limited,
            GameMode::ScoreLimited => &self.score_limited,
        }
    }

    fn entries_mut(&mut self, mode: GameMode) -> &mut Vec<HighScoreEntry> {
        match mode {
            GameMode::TimeLimited => &mut self.time_limited,
            GameMode::ScoreLimited => &mut self.score_limited,
        }
    }

    /// Check if a result qualifies for its leaderboard
    pub fn qualifies(&self, result: &SessionResult) -> bool {
        if result.mode == GameMode::TimeLimited && result.value <= 0 {
            return false;
        }
        let entries = self.entries(result.mode);
        if entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        entries
            .last()
            .map(|e| beats(result.mode, result.value, e.value))
            .unwrap_or(true)
    }

    /// Add a result (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify
    pub fn add_result(&mut self, result: &SessionResult, timestamp: f64) -> Option<usize> {
        if !self.qualifies(result) {
            return None;
        }

        let mode = result.mode;
        let entry = HighScoreEntry {
            value: result.value,
            timestamp,
        };
        let entries = self.entries_mut(mode);

        // Ties go after existing entries
        let pos = entries.iter().position(|e| beats(mode, result.value, e.value));
        let rank = match pos {
            Some(i) => {
                entries.insert(i, entry);
                i + 1
            }
            None => {
                entries.push(entry);
                entries.len()
            }
        };

        entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Best value recorded for a mode
    pub fn best(&self, mode: GameMode) -> Option<i32> {
        self.entries(mode).first().map(|e| e.value)
    }

    /// Check if both leaderboards are empty
    pub fn is_empty(&self) -> bool {
        self.time_limited.is_empty() && self.score_limited.is_empty()
    }

    /// Load high scores from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(scores) = serde_json::from_str::<HighScores>(&json) {
                    log::info!(
                        "Loaded high scores ({} timed, {} target)",
                        scores.time_limited.len(),
                        scores.score_limited.len()
                    );
                    return scores;
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save high scores to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High scores saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed(value: i32) -> SessionResult {
        SessionResult {
            mode: GameMode::TimeLimited,
            value,
        }
    }

    fn target(value: i32) -> SessionResult {
        SessionResult {
            mode: GameMode::ScoreLimited,
            value,
        }
    }

    #[test]
    fn test_zero_points_never_qualify() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(&timed(0)));
        assert!(scores.qualifies(&timed(1)));
    }

    #[test]
    fn test_time_limited_ranks_higher_first() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_result(&timed(10), 0.0), Some(1));
        assert_eq!(scores.add_result(&timed(30), 1.0), Some(1));
        assert_eq!(scores.add_result(&timed(20), 2.0), Some(2));
        assert_eq!(scores.best(GameMode::TimeLimited), Some(30));
        assert_eq!(scores.best(GameMode::ScoreLimited), None);
    }

    #[test]
    fn test_score_limited_ranks_faster_first() {
        let mut scores = HighScores::new();
        scores.add_result(&target(90), 0.0);
        assert_eq!(scores.add_result(&target(45), 1.0), Some(1));
        assert_eq!(scores.best(GameMode::ScoreLimited), Some(45));
    }

    #[test]
    fn test_table_is_capped() {
        let mut scores = HighScores::new();
        for v in 1..=15 {
            scores.add_result(&timed(v), v as f64);
        }
        assert_eq!(scores.entries(GameMode::TimeLimited).len(), MAX_HIGH_SCORES);
        assert_eq!(scores.best(GameMode::TimeLimited), Some(15));
        assert!(!scores.qualifies(&timed(5)));
        assert!(scores.qualifies(&timed(7)));
    }

    #[test]
    fn test_old_json_without_a_mode_loads() {
        let scores: HighScores = serde_json::from_str(r#"{"time_limited": [{"value": 3, "timestamp": 0.0}]}"#).unwrap();
        assert_eq!(scores.best(GameMode::TimeLimited), Some(3));
        assert!(scores.score_limited.is_empty());
    }
}
