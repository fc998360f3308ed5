use thiserror::Error;

use super::types::DegradeReason;
use crate::completion::CompletionError;

/// Failures on the semantic scoring path. Never surfaced to callers; each one
/// maps to a [`DegradeReason`].
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("completion service not configured")]
    Disabled,

    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("malformed scoring payload: {reason}")]
    MalformedPayload { reason: String },

    #[error("scoring payload missing '{field}'")]
    MissingField { field: &'static str },

    #[error("invalid score: {raw}")]
    InvalidScore { raw: String },
}

impl ScoringError {
    pub fn degrade_reason(&self) -> DegradeReason {
        match self {
            ScoringError::Disabled => DegradeReason::Disabled,
            ScoringError::Completion(_) => DegradeReason::Completion,
            ScoringError::MalformedPayload { .. } => DegradeReason::MalformedPayload,
            ScoringError::MissingField { .. } => DegradeReason::MissingField,
            ScoringError::InvalidScore { .. } => DegradeReason::InvalidScore,
        }
    }
}
