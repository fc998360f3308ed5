use crate::constants::{DEFAULT_LOW_QUALITY_THRESHOLD, DEFAULT_SCORE_MAX, DEFAULT_SCORE_MIN};

#[derive(Debug, Clone, Copy, PartialEq)]
/// Score range and low-quality threshold, fixed at construction.
pub struct ScoringConfig {
    /// Lower bound of the score range (inclusive).
    pub score_min: f64,
    /// Upper bound of the score range (inclusive).
    pub score_max: f64,
    /// Scores strictly below this are low quality.
    pub low_quality_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            score_min: DEFAULT_SCORE_MIN,
            score_max: DEFAULT_SCORE_MAX,
            low_quality_threshold: DEFAULT_LOW_QUALITY_THRESHOLD,
        }
    }
}

impl ScoringConfig {
    pub fn new(score_min: f64, score_max: f64, low_quality_threshold: f64) -> Self {
        Self {
            score_min,
            score_max,
            low_quality_threshold,
        }
    }

    /// Clamps into `[score_min, score_max]`. NaN maps to `score_min`.
    pub fn clamp(&self, score: f64) -> f64 {
        if score.is_nan() {
            return self.score_min;
        }
        score.clamp(self.score_min, self.score_max)
    }

    pub fn contains(&self, score: f64) -> bool {
        score.is_finite() && score >= self.score_min && score <= self.score_max
    }

    pub fn is_low_quality(&self, score: Option<f64>) -> bool {
        score.is_some_and(|s| s < self.low_quality_threshold)
    }

    /// Maps a score onto `[0, 1]` relative to this range.
    pub fn normalize(&self, score: f64) -> f64 {
        let span = self.score_max - self.score_min;
        if span <= 0.0 {
            return 0.0;
        }
        ((score - self.score_min) / span).clamp(0.0, 1.0)
    }
}
