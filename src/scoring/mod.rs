//! Guideline scoring with a deterministic fallback.
//!
//! [`GuidelineScorer::score`] maps `(text, guideline)` to a [`ScoreOutcome`]:
//!
//! - [`ScoreOutcome::Unscored`] when there is nothing to grade (empty answer or
//!   no guideline).
//! - [`ScoreOutcome::Scored`] when the completion service returned a valid
//!   `{score, rationale}` payload.
//! - [`ScoreOutcome::Degraded`] when the service is absent or anything about the
//!   call failed. The score then comes from answer length alone and carries the
//!   [`HEURISTIC_RATIONALE`](crate::constants::HEURISTIC_RATIONALE) sentinel.
//!
//! Every score is clamped to [`ScoringConfig`]'s `[min, max]` regardless of path.
//! Scoring never returns an error to its caller.

pub mod config;
pub mod error;
pub mod prompt;
pub mod scorer;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::ScoringConfig;
pub use error::ScoringError;
pub use scorer::{GuidelineScorer, heuristic_score, parse_score_payload};
pub use types::{DegradeReason, ScoreOutcome, ScoringStatus};
