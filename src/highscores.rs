//! High score leaderboard system
//!
//! Fed by finished runs through [`ScoreSink`], tracks top 10 scores.
//! Serializes to JSON; where it is kept is up to the host.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::sim::{RunSummary, ScoreSink};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player's score
    pub score: u64,
    /// Distance run (arcade units)
    pub distance: f32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Slot a score would take. Equal scores rank below the runs already
    /// on the board.
    fn slot_for(&self, score: u64) -> usize {
        self.entries.partition_point(|e| e.score >= score)
    }

    /// Check if a run with this score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        score > 0 && self.slot_for(score) < MAX_HIGH_SCORES
    }

    /// Record a finished run. Returns the rank achieved (1-indexed), or None
    /// if the score didn't make the board.
    pub fn add_score(&mut self, score: u64, distance: f32, timestamp: f64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let slot = self.slot_for(score);
        self.entries.insert(
            slot,
            HighScoreEntry {
                score,
                distance,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(slot + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Longest run on the board, whatever its score
    pub fn best_distance(&self) -> Option<f32> {
        self.entries.iter().map(|e| e.distance).reduce(f32::max)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a leaderboard; entries are re-sorted and trimmed
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
        scores.entries.truncate(MAX_HIGH_SCORES);
        Ok(scores)
    }
}

impl ScoreSink for HighScores {
    fn score_increment(&mut self, _delta: u64) {}

    fn run_finished(&mut self, summary: &RunSummary) {
        if let Some(rank) = self.add_score(summary.score, summary.distance, now_ms()) {
            log::info!("New high score #{rank}: {}", summary.score);
        }
    }
}

/// Wall-clock time in Unix milliseconds
fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
