//! Incremental rating aggregate shared by tours, parks, and lodges.

use serde::{Deserialize, Serialize};

/// Running mean of review scores attached to a rateable entity.
///
/// The average is updated incrementally on every posted review:
/// `average = (average * count + score) / (count + 1)`. Input scores are
/// bounded to 1–5 by review validation, so the average stays within
/// 0–5 without separate clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
    /// Current mean score, 0.0 when no reviews exist.
    pub average: f64,
    /// Number of scores accumulated.
    pub count: u64,
}

impl RatingStats {
    /// Creates an empty aggregate (no reviews yet).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            average: 0.0,
            count: 0,
        }
    }

    /// Folds one score into the running mean.
    #[allow(clippy::cast_precision_loss)]
    pub fn add_score(&mut self, score: u8) {
        let total = self.average * self.count as f64 + f64::from(score);
        self.count += 1;
        self.average = total / self.count as f64;
    }
}

impl Default for RatingStats {
    fn default() -> Self {
        Self::new()
    }
}
