//! Offline comparison of scoring models against gold labels.
//!
//! Rows are read from JSONL (`{"answer", "guideline", "gold_score"}`, gold on a
//! 0-1 scale), scored by one [`GuidelineScorer`](crate::scoring::GuidelineScorer)
//! per model, and summarised with MAE, MSE, tie-aware Spearman correlation and
//! coverage. Predictions are normalized to 0-1 with the scorer's range before
//! comparison. With an output directory, each model's predictions are also
//! dumped to `raw_<model>.jsonl` and the metrics to `summary_gold.csv`.

pub mod metrics;
pub mod output;
pub mod runner;


pub use metrics::{MetricSummary, average_ranks, coverage, mae, mse, spearman};
pub use output::{SUMMARY_FILE, raw_file_name, summary_csv, write_outputs};
pub use runner::{EvalRow, ModelReport, evaluate, load_rows, mean_abs_diff, parse_rows};
