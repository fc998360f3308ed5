use std::fmt;

use serde::{Deserialize, Serialize};

/// Why the heuristic replaced the semantic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegradeReason {
    /// No completion service configured.
    Disabled,
    /// The call failed (provider error, rate limit, timeout, empty reply).
    Completion,
    /// Reply was not a JSON object.
    MalformedPayload,
    /// `score` or `rationale` missing.
    MissingField,
    /// `score` non-numeric, non-finite, or outside the configured range.
    InvalidScore,
}

impl DegradeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DegradeReason::Disabled => "disabled",
            DegradeReason::Completion => "completion",
            DegradeReason::MalformedPayload => "malformed_payload",
            DegradeReason::MissingField => "missing_field",
            DegradeReason::InvalidScore => "invalid_score",
        }
    }
}

impl fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Result of scoring one answer against one guideline.
pub enum ScoreOutcome {
    /// Nothing to grade.
    Unscored,
    /// Semantic score from the completion service.
    Scored {
        /// Clamped score.
        score: f64,
        /// Model rationale (never blank).
        rationale: String,
    },
    /// Length heuristic substituted for the semantic score.
    Degraded {
        /// Clamped heuristic score.
        score: f64,
        /// Sentinel rationale.
        rationale: String,
        /// What went wrong on the primary path.
        reason: DegradeReason,
    },
}

impl ScoreOutcome {
    pub fn score(&self) -> Option<f64> {
        match self {
            ScoreOutcome::Unscored => None,
            ScoreOutcome::Scored { score, .. } | ScoreOutcome::Degraded { score, .. } => {
                Some(*score)
            }
        }
    }

    pub fn rationale(&self) -> Option<&str> {
        match self {
            ScoreOutcome::Unscored => None,
            ScoreOutcome::Scored { rationale, .. } | ScoreOutcome::Degraded { rationale, .. } => {
                Some(rationale)
            }
        }
    }

    pub fn is_unscored(&self) -> bool {
        matches!(self, ScoreOutcome::Unscored)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ScoreOutcome::Degraded { .. })
    }

    pub fn degrade_reason(&self) -> Option<DegradeReason> {
        match self {
            ScoreOutcome::Degraded { reason, .. } => Some(*reason),
            _ => None,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ScoreOutcome::Unscored => "UNSCORED",
            ScoreOutcome::Scored { .. } => "SCORED",
            ScoreOutcome::Degraded { .. } => "DEGRADED",
        }
    }
}

impl fmt::Display for ScoreOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreOutcome::Unscored => write!(f, "UNSCORED"),
            ScoreOutcome::Scored { score, .. } => write!(f, "SCORED ({:.2})", score),
            ScoreOutcome::Degraded { score, reason, .. } => {
                write!(f, "DEGRADED ({:.2}, {})", score, reason)
            }
        }
    }
}

/// Scoring lifecycle of an answer.
///
/// `Unscored -> Scored` on the first score written, then `Rescored` on every
/// later one. `Rescored` keeps looping; no state is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStatus {
    Unscored,
    Scored,
    Rescored,
}

impl ScoringStatus {
    pub fn from_revisions(has_score: bool, revisions: u32) -> Self {
        match (has_score, revisions) {
            (false, _) | (true, 0) => ScoringStatus::Unscored,
            (true, 1) => ScoringStatus::Scored,
            (true, _) => ScoringStatus::Rescored,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringStatus::Unscored => "unscored",
            ScoringStatus::Scored => "scored",
            ScoringStatus::Rescored => "rescored",
        }
    }
}
