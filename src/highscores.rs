//! Best-score tracking
//!
//! A single integer, persisted through a `KeyValueStore` under
//! `consts::HIGH_SCORE_KEY`.

use serde::{Deserialize, Serialize};

use crate::consts::HIGH_SCORE_KEY;
use crate::persistence::KeyValueStore;

/// The best score seen across runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u32,
}

impl HighScore {
    pub fn new(best: u32) -> Self {
        Self { best }
    }

    /// Check if a score beats the current best
    pub fn qualifies(&self, score: u32) -> bool {
        score > self.best
    }

    /// Record a finished run's score. Returns true if it became the new best.
    pub fn submit(&mut self, score: u32) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.best = score;
        true
    }

    /// Load from a store (absent or negative values read as 0)
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let raw = store.get(HIGH_SCORE_KEY);
        let best = u32::try_from(raw.max(0)).unwrap_or(u32::MAX);
        log::info!("Loaded high score {}", best);
        Self { best }
    }

    /// Write to a store and flush. Failures are logged; the in-memory value
    /// stays authoritative.
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        store.set(HIGH_SCORE_KEY, i64::from(self.best));
        match store.flush() {
            Ok(()) => log::info!("High score saved ({})", self.best),
            Err(e) => log::warn!("Failed to persist high score {}: {}", self.best, e),
        }
    }
}
