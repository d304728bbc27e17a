//! High score leaderboard system
//!
//! Persisted through platform storage, tracks top 10 scores.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::platform::storage;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Characters kept from a player's label
pub const LABEL_LEN: usize = 2;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player initials
    pub label: String,
    pub score: u64,
    /// Level reached
    pub level: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

/// Trim, upper-case and cut a label down to initials
pub fn normalize_label(label: &str) -> String {
    label
        .trim()
        .chars()
        .take(LABEL_LEN)
        .flat_map(char::to_uppercase)
        .collect()
}

impl HighScores {
    /// Storage key
    const STORAGE_KEY: &'static str = "brickout_highscores";

    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Matching the lowest entry is enough to displace it
        self.entries.last().map(|e| score >= e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score >= e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies).
    /// Returns the rank achieved (1-indexed) or None if it didn't qualify or
    /// the label is empty.
    pub fn add_score(&mut self, label: &str, score: u64, level: u32, timestamp: f64) -> Option<usize> {
        let label = normalize_label(label);
        if label.is_empty() {
            log::warn!("Ignoring high score {score} without a label");
            return None;
        }
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            label,
            score,
            level,
            timestamp,
        };

        // Sorted descending by score; a new entry goes ahead of equal scores
        let pos = self.entries.iter().position(|e| score >= e.score);
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

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Load high scores, starting fresh if none are stored or they are unreadable
    pub fn load() -> Self {
        match storage::load(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<HighScores>(&json) {
                Ok(mut scores) => {
                    scores.sanitize();
                    log::info!("Loaded {} high scores", scores.entries.len());
                    return scores;
                }
                Err(err) => log::warn!("Ignoring unreadable high scores: {err}"),
            },
            Ok(None) => {}
            Err(err) => log::warn!("Could not read high scores: {err}"),
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    pub fn save(&self) -> Result<(), EngineError> {
        let json = serde_json::to_string(self)?;
        storage::save(Self::STORAGE_KEY, &json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Restore ordering and limits on a stored list
    fn sanitize(&mut self) {
        self.entries.retain(|e| !e.label.is_empty());
        // Stable sort keeps the stored order on ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }
}
