use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::metrics::MetricSummary;
use crate::completion::CompletionClient;
use crate::scoring::GuidelineScorer;

/// One labelled example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalRow {
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub guideline: Option<String>,
    /// Gold label on a 0-1 scale.
    #[serde(default)]
    pub gold_score: Option<f64>,
}

/// Parses JSONL, skipping blank lines. Line numbers in errors are 1-based.
pub fn parse_rows(input: &str) -> anyhow::Result<Vec<EvalRow>> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line.trim()).with_context(|| format!("invalid eval row on line {}", idx + 1))
        })
        .collect()
}

pub fn load_rows(path: &Path) -> anyhow::Result<Vec<EvalRow>> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read eval set {}", path.display()))?;
    parse_rows(&input)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Predictions and metrics for one model.
pub struct ModelReport {
    pub model: String,
    /// Raw predictions on the scorer's own scale, row-aligned.
    pub predictions: Vec<Option<f64>>,
    /// Predictions mapped to 0-1, row-aligned.
    pub normalized: Vec<Option<f64>>,
    pub rationales: Vec<Option<String>>,
    /// Rows where the heuristic stood in for the model.
    pub degraded: usize,
    pub summary: MetricSummary,
}

impl ModelReport {
    pub fn summary_line(&self) -> String {
        let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"));
        format!(
            "[{}] MAE={}  MSE={}  Spearman={}  Coverage={:.2}  Degraded={}",
            self.model,
            fmt(self.summary.mae),
            fmt(self.summary.mse),
            fmt(self.summary.spearman),
            self.summary.coverage,
            self.degraded,
        )
    }
}

/// Scores every row with `scorer` and summarises against the gold labels.
#[instrument(skip(scorer, rows), fields(rows = rows.len()))]
pub async fn evaluate<C: CompletionClient>(
    model: &str,
    scorer: &GuidelineScorer<C>,
    rows: &[EvalRow],
) -> ModelReport {
    let config = *scorer.config();
    let mut predictions = Vec::with_capacity(rows.len());
    let mut rationales = Vec::with_capacity(rows.len());
    let mut degraded = 0;

    for row in rows {
        let outcome = scorer.score(&row.answer, row.guideline.as_deref()).await;
        if outcome.is_degraded() {
            degraded += 1;
        }
        predictions.push(outcome.score());
        rationales.push(outcome.rationale().map(str::to_string));
    }

    let normalized: Vec<Option<f64>> = predictions
        .iter()
        .map(|p| p.map(|s| config.normalize(s)))
        .collect();
    let gold: Vec<Option<f64>> = rows.iter().map(|r| r.gold_score).collect();
    let summary = MetricSummary::compute(&gold, &normalized);

    info!(model, degraded, coverage = summary.coverage, "Model evaluated");

    ModelReport {
        model: model.to_string(),
        predictions,
        normalized,
        rationales,
        degraded,
        summary,
    }
}

/// Mean absolute difference between two models' normalized predictions over
/// rows both of them scored.
pub fn mean_abs_diff(reference: &ModelReport, other: &ModelReport) -> Option<f64> {
    let diffs: Vec<f64> = reference
        .normalized
        .iter()
        .zip(&other.normalized)
        .filter_map(|(a, b)| Some(((*a)? - (*b)?).abs()))
        .collect();
    if diffs.is_empty() {
        return None;
    }
    Some(diffs.iter().sum::<f64>() / diffs.len() as f64)
}
