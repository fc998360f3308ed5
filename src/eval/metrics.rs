use std::cmp::Ordering;

use serde::Serialize;

/// 0-based ranks, ties sharing the mean of their positions.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|a, b| values[*a].partial_cmp(&values[*b]).unwrap_or(Ordering::Equal));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i + 1;
        while j < order.len() && values[order[j]] == values[order[i]] {
            j += 1;
        }
        let rank = (i + j - 1) as f64 / 2.0;
        for idx in &order[i..j] {
            ranks[*idx] = rank;
        }
        i = j;
    }
    ranks
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    Some(values.sum::<f64>() / n as f64)
}

/// Spearman rank correlation over paired values.
///
/// `None` with fewer than two pairs or when either side has no variance.
pub fn spearman(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let xr = average_ranks(&xs[..n]);
    let yr = average_ranks(&ys[..n]);
    let mx = mean(xr.iter().copied())?;
    let my = mean(yr.iter().copied())?;

    let num: f64 = xr.iter().zip(&yr).map(|(a, b)| (a - mx) * (b - my)).sum();
    let den_x = xr.iter().map(|a| (a - mx).powi(2)).sum::<f64>().sqrt();
    let den_y = yr.iter().map(|b| (b - my).powi(2)).sum::<f64>().sqrt();
    let den = den_x * den_y;
    if den == 0.0 { None } else { Some(num / den) }
}

pub fn mae(pairs: &[(f64, f64)]) -> Option<f64> {
    mean(pairs.iter().map(|(g, p)| (g - p).abs()))
}

pub fn mse(pairs: &[(f64, f64)]) -> Option<f64> {
    mean(pairs.iter().map(|(g, p)| (g - p).powi(2)))
}

/// Share of rows that produced a prediction.
pub fn coverage(predictions: &[Option<f64>]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    predictions.iter().filter(|p| p.is_some()).count() as f64 / predictions.len() as f64
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
/// Agreement between normalized predictions and gold labels.
pub struct MetricSummary {
    pub mae: Option<f64>,
    pub mse: Option<f64>,
    pub spearman: Option<f64>,
    pub coverage: f64,
}

impl MetricSummary {
    /// Compares row-aligned gold labels and predictions, both on 0-1.
    pub fn compute(gold: &[Option<f64>], predictions: &[Option<f64>]) -> Self {
        let pairs: Vec<(f64, f64)> = gold
            .iter()
            .zip(predictions)
            .filter_map(|(g, p)| Some(((*g)?, (*p)?)))
            .collect();
        let (gs, ps): (Vec<f64>, Vec<f64>) = pairs.iter().copied().unzip();

        Self {
            mae: mae(&pairs),
            mse: mse(&pairs),
            spearman: spearman(&gs, &ps),
            coverage: coverage(predictions),
        }
    }
}
