use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::config::ScoringConfig;
use super::error::ScoringError;
use super::prompt::build_score_request;
use super::types::ScoreOutcome;
use crate::completion::CompletionClient;
use crate::constants::{DEFAULT_LLM_RATIONALE, HEURISTIC_RATIONALE, HEURISTIC_SATURATION_CHARS};

/// Length-only score: linear in trimmed character count, saturating at
/// [`HEURISTIC_SATURATION_CHARS`].
///
/// Callers pass the scoring context, so an answer with references is measured
/// including the section headers and quoted answers, while an unreferenced
/// answer is measured on its raw text.
pub fn heuristic_score(text: &str, config: &ScoringConfig) -> f64 {
    let chars = text.trim().chars().count() as f64;
    let fraction = (chars / HEURISTIC_SATURATION_CHARS as f64).min(1.0);
    config.clamp(fraction * config.score_max)
}

/// Parses a `{score, rationale}` reply.
///
/// Leading prose is skipped up to the first `{`. `score` may be a number or a
/// numeric string and must lie within the configured range.
pub fn parse_score_payload(
    reply: &str,
    config: &ScoringConfig,
) -> Result<(f64, String), ScoringError> {
    let text = reply.trim();
    let start = text.find('{').ok_or_else(|| ScoringError::MalformedPayload {
        reason: "no JSON object in reply".to_string(),
    })?;

    let value: Value = serde_json::Deserializer::from_str(&text[start..])
        .into_iter::<Value>()
        .next()
        .ok_or_else(|| ScoringError::MalformedPayload {
            reason: "empty JSON segment".to_string(),
        })?
        .map_err(|e| ScoringError::MalformedPayload {
            reason: e.to_string(),
        })?;

    let raw_score = value
        .get("score")
        .filter(|v| !v.is_null())
        .ok_or(ScoringError::MissingField { field: "score" })?;

    let score = match raw_score {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|s| config.contains(*s))
    .ok_or_else(|| ScoringError::InvalidScore {
        raw: raw_score.to_string(),
    })?;

    let rationale = value
        .get("rationale")
        .and_then(Value::as_str)
        .ok_or(ScoringError::MissingField { field: "rationale" })?
        .trim();

    let rationale = if rationale.is_empty() {
        DEFAULT_LLM_RATIONALE.to_string()
    } else {
        rationale.to_string()
    };

    Ok((score, rationale))
}

/// Scores answers against a guideline through an optional completion client.
pub struct GuidelineScorer<C> {
    config: ScoringConfig,
    client: Option<Arc<C>>,
}

impl<C> Clone for GuidelineScorer<C> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            client: self.client.clone(),
        }
    }
}

impl<C: CompletionClient> std::fmt::Debug for GuidelineScorer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuidelineScorer")
            .field("config", &self.config)
            .field("model", &self.model())
            .finish()
    }
}

impl<C: CompletionClient> GuidelineScorer<C> {
    pub fn new(config: ScoringConfig, client: Option<Arc<C>>) -> Self {
        Self { config, client }
    }

    /// Scorer that always takes the heuristic path.
    pub fn heuristic_only(config: ScoringConfig) -> Self {
        Self::new(config, None)
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn model(&self) -> Option<&str> {
        self.client.as_deref().map(CompletionClient::model)
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Scores `text` against `guideline`. Never fails.
    ///
    /// An empty `text` or a missing/blank guideline is [`ScoreOutcome::Unscored`].
    /// Whitespace-only text is still graded (the heuristic gives it the minimum).
    #[instrument(skip(self, text, guideline), fields(text_len = text.len(), has_guideline = guideline.is_some()))]
    pub async fn score(&self, text: &str, guideline: Option<&str>) -> ScoreOutcome {
        let Some(guideline) = guideline.map(str::trim).filter(|g| !g.is_empty()) else {
            debug!("No guideline; leaving answer unscored");
            return ScoreOutcome::Unscored;
        };
        if text.is_empty() {
            debug!("Empty answer; leaving unscored");
            return ScoreOutcome::Unscored;
        }

        match self.score_semantic(text, guideline).await {
            Ok((score, rationale)) => {
                let score = self.config.clamp(score);
                debug!(score, "Semantic score");
                ScoreOutcome::Scored { score, rationale }
            }
            Err(e) => {
                let reason = e.degrade_reason();
                match &e {
                    ScoringError::Disabled => debug!("Completion disabled; heuristic score"),
                    other => warn!(error = %other, %reason, "Semantic scoring failed; heuristic score"),
                }
                ScoreOutcome::Degraded {
                    score: heuristic_score(text, &self.config),
                    rationale: HEURISTIC_RATIONALE.to_string(),
                    reason,
                }
            }
        }
    }

    async fn score_semantic(
        &self,
        text: &str,
        guideline: &str,
    ) -> Result<(f64, String), ScoringError> {
        let client = self.client.as_ref().ok_or(ScoringError::Disabled)?;
        let request = build_score_request(text, guideline, &self.config);
        let reply = client.complete(&request).await?;
        parse_score_payload(&reply, &self.config)
    }
}
