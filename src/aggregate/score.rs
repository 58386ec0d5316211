//! Composite "fast + quality" scoring policy
//!
//! The score rewards higher passrate and lower duration:
//!
//! ```text
//! normalized(d) = (d - min_duration) / (max_duration - min_duration)
//! score = passrate_weight * passrate + duration_weight * (1 - normalized(d))
//! ```
//!
//! Durations are min-max normalized across the current result set; when all
//! durations are equal the normalized value is 0.0, so every entry receives
//! the full duration credit. The weights are configuration, not hidden
//! constants, and stay fixed within a single rebuild so the computation is
//! reproducible.
//!
//! Monotonicity holds within one rebuild: raising an entry's passrate or
//! lowering its duration never lowers its score.

use serde::{Deserialize, Serialize};

use super::entry::LeaderboardEntry;

fn default_passrate_weight() -> f64 {
    0.7
}

fn default_duration_weight() -> f64 {
    0.3
}

/// Weights for the composite score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositePolicy {
    /// Weight of the quality term (passrate)
    #[serde(default = "default_passrate_weight")]
    pub passrate_weight: f64,
    /// Weight of the speed term (1 - normalized duration)
    #[serde(default = "default_duration_weight")]
    pub duration_weight: f64,
}

impl Default for CompositePolicy {
    fn default() -> Self {
        Self {
            passrate_weight: default_passrate_weight(),
            duration_weight: default_duration_weight(),
        }
    }
}

impl CompositePolicy {
    /// Validates the weights.
    pub fn validate(&self) -> Result<(), String> {
        if !self.passrate_weight.is_finite() || self.passrate_weight < 0.0 {
            return Err(format!(
                "passrate_weight must be a non-negative number, got {}",
                self.passrate_weight
            ));
        }
        if !self.duration_weight.is_finite() || self.duration_weight < 0.0 {
            return Err(format!(
                "duration_weight must be a non-negative number, got {}",
                self.duration_weight
            ));
        }
        if self.passrate_weight + self.duration_weight == 0.0 {
            return Err("composite weights must not both be zero".to_string());
        }
        Ok(())
    }

    /// Fills in `composite_score` for every entry.
    ///
    /// Normalization spans the given entry set, so the scores of one rebuild
    /// form a single consistent ranking.
    pub fn score_entries(&self, entries: &mut [LeaderboardEntry]) {
        if entries.is_empty() {
            return;
        }

        let mut min_duration = f64::INFINITY;
        let mut max_duration = f64::NEG_INFINITY;
        for entry in entries.iter() {
            min_duration = min_duration.min(entry.duration_minutes);
            max_duration = max_duration.max(entry.duration_minutes);
        }
        let span = max_duration - min_duration;

        for entry in entries.iter_mut() {
            let normalized = if span > 0.0 {
                (entry.duration_minutes - min_duration) / span
            } else {
                0.0
            };
            entry.composite_score =
                self.passrate_weight * entry.passrate + self.duration_weight * (1.0 - normalized);
        }
    }
}
