//! High score leaderboard
//!
//! Persisted to LocalStorage, tracks the top 5 scores. The sim never
//! touches this; the host records a score when it drains a
//! `GameEvent::RunEnded`.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// A single high score entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "duck_jam_highscores";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard. Zero never does.
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a new score (if it qualifies). Returns the rank achieved
    /// (1-indexed) or None if it didn't qualify.
    pub fn add_score(&mut self, score: u32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry { score, timestamp };
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The best score so far (if any). Read before writing a new score to
    /// decide whether the finished run set a new record.
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
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
                    log::info!("Loaded {} high scores", scores.entries.len());
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
                log::info!("High scores saved ({} entries)", self.entries.len());
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

    #[test]
    fn test_zero_score_never_qualifies() {
        let scores = HighScores::new();
        assert!(!scores.qualifies(0));
        let mut scores = HighScores::new();
        assert!(scores.add_score(0, 0.0).is_none());
        assert!(scores.is_empty());
    }

    #[test]
    fn test_entries_sorted_and_capped() {
        let mut scores = HighScores::new();
        for (i, s) in [12, 40, 7, 25, 33, 19].iter().enumerate() {
            scores.add_score(*s, i as f64);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        let values: Vec<u32> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(values, vec![40, 33, 25, 19, 12]);
        assert_eq!(scores.top_score(), Some(40));
    }

    #[test]
    fn test_rank_reported_for_new_entry() {
        let mut scores = HighScores::new();
        scores.add_score(30, 0.0);
        scores.add_score(20, 1.0);
        assert_eq!(scores.add_score(25, 2.0), Some(2));
        assert_eq!(scores.add_score(1, 3.0), Some(4));
    }

    #[test]
    fn test_full_board_rejects_low_scores() {
        let mut scores = HighScores::new();
        for s in [50, 40, 30, 20, 10] {
            scores.add_score(s, 0.0);
        }
        assert!(!scores.qualifies(10));
        assert!(scores.add_score(5, 0.0).is_none());
        assert_eq!(scores.add_score(45, 0.0), Some(2));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
    }
}
