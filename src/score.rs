//! In-session scoreboard
//!
//! Tracks the running score and the best score seen since the process
//! started. Nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Current and best score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub score: u64,
    pub high_score: u64,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add points, raising the high score if it was beaten
    pub fn add(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
        self.high_score = self.high_score.max(self.score);
    }

    /// Apply a simulation event; only `Score` changes anything
    pub fn apply(&mut self, event: &GameEvent) {
        if let GameEvent::Score { points } = event {
            self.add(*points);
        }
    }

    /// Start a new game (the high score survives)
    pub fn reset_score(&mut self) {
        self.score = 0;
    }

    /// Zero-padded HUD text, e.g. `0120`
    pub fn format(value: u64) -> String {
        format!("{:04}", value)
    }
}
