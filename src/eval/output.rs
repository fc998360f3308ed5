//! Per-model prediction dumps and the metrics CSV.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use super::runner::{EvalRow, ModelReport};

pub const SUMMARY_FILE: &str = "summary_gold.csv";

const SUMMARY_HEADER: &str = "model,mae,mse,spearman,coverage";

/// One input row echoed back with the model's prediction.
#[derive(Serialize)]
struct RawPrediction<'a> {
    #[serde(flatten)]
    row: &'a EvalRow,
    model: &'a str,
    /// On the scorer's own scale.
    score_pred: Option<f64>,
    rationale: Option<&'a str>,
}

/// `raw_<model>.jsonl`, with anything outside `[A-Za-z0-9._-]` replaced by `_`.
pub fn raw_file_name(model: &str) -> String {
    let safe: String = model
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("raw_{safe}.jsonl")
}

fn write_raw(dir: &Path, rows: &[EvalRow], report: &ModelReport) -> anyhow::Result<PathBuf> {
    let path = dir.join(raw_file_name(&report.model));
    let file = File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);

    for (idx, row) in rows.iter().enumerate() {
        let record = RawPrediction {
            row,
            model: &report.model,
            score_pred: report.predictions.get(idx).copied().flatten(),
            rationale: report.rationales.get(idx).and_then(|r| r.as_deref()),
        };
        serde_json::to_writer(&mut out, &record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(path)
}

fn csv_text(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Header plus one row per model; missing metrics are empty cells.
pub fn summary_csv(reports: &[ModelReport]) -> String {
    let mut csv = String::from(SUMMARY_HEADER);
    csv.push('\n');
    for report in reports {
        let summary = &report.summary;
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            csv_text(&report.model),
            csv_number(summary.mae),
            csv_number(summary.mse),
            csv_number(summary.spearman),
            summary.coverage,
        ));
    }
    csv
}

/// Writes every model's raw predictions and the summary CSV into `dir`,
/// creating it if needed.
pub fn write_outputs(dir: &Path, rows: &[EvalRow], reports: &[ModelReport]) -> anyhow::Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    for report in reports {
        write_raw(dir, rows, report)?;
    }

    let summary = dir.join(SUMMARY_FILE);
    fs::write(&summary, summary_csv(reports))
        .with_context(|| format!("failed to write {}", summary.display()))?;

    info!(dir = %dir.display(), models = reports.len(), "Eval outputs written");
    Ok(())
}
