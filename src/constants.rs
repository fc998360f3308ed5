//! Cross-cutting, shared constants.
//!
//! Prefer deriving secondary constants from primary ones to avoid drift.
//!
//! # Score Scale
//!
//! Scores live on a configurable closed range (default `[0, 5]`). The low-quality
//! threshold is expressed on the same scale, so changing the range without
//! changing the threshold silently shifts which answers are flagged.

/// Default lower bound of the score range.
pub const DEFAULT_SCORE_MIN: f64 = 0.0;

/// Default upper bound of the score range.
pub const DEFAULT_SCORE_MAX: f64 = 5.0;

/// Scores strictly below this value mark an answer as low quality.
pub const DEFAULT_LOW_QUALITY_THRESHOLD: f64 = 2.0;

/// Trimmed answer length (in characters) at which the heuristic saturates.
pub const HEURISTIC_SATURATION_CHARS: usize = 200;

/// Rationale attached to every heuristic (non-semantic) score.
pub const HEURISTIC_RATIONALE: &str = "Heuristic fallback based on answer length (no LLM scoring).";

/// Rationale used when the completion service scores but returns a blank rationale.
pub const DEFAULT_LLM_RATIONALE: &str = "Scored by LLM.";

/// Default completion model identifier.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Default completion request timeout.
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;

/// Separator used when several reference warnings apply to one answer.
pub const WARNING_SEPARATOR: &str = "; ";

/// Body of a referenced-answer section when the respondent has not answered it.
pub const NO_ANSWER_PLACEHOLDER: &str = "<no answer>";

/// Browser origin allowed by CORS when none is configured.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Response header carrying a short machine-readable outcome tag.
pub const GRADER_STATUS_HEADER: &str = "x-grader-status";
