use super::FilterResult;
use crate::error::ConfigError;
use serde::Serialize;

/// A filter singled out by the summary.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedFilter {
    pub label: String,
    pub mse: f64,
    pub psnr: f64,
}

impl RankedFilter {
    fn from_result(r: &FilterResult) -> Self {
        Self {
            label: r.label().to_string(),
            mse: r.mse(),
            psnr: r.psnr(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MetricStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricStats {
    fn from_values(values: impl Iterator<Item = f64>) -> Self {
        let mut n = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            n += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        Self {
            mean: sum / n as f64,
            min,
            max,
        }
    }
}

/// Best/worst filters and metric statistics, derived from a result set.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSummary {
    /// Lowest MSE; the earliest entry wins ties.
    pub best: RankedFilter,
    /// Highest MSE; the earliest entry wins ties.
    pub worst: RankedFilter,
    pub mse: MetricStats,
    pub psnr: MetricStats,
    pub filter_count: usize,
}

/// Summarize `results` without modifying them.
pub fn summarize(results: &[FilterResult]) -> Result<EvaluationSummary, ConfigError> {
    let first = results.first().ok_or(ConfigError::EmptyResultSet)?;
    let mut best = first;
    let mut worst = first;
    for r in &results[1..] {
        if r.mse() < best.mse() {
            best = r;
        }
        if r.mse() > worst.mse() {
            worst = r;
        }
    }
    Ok(EvaluationSummary {
        best: RankedFilter::from_result(best),
        worst: RankedFilter::from_result(worst),
        mse: MetricStats::from_values(results.iter().map(FilterResult::mse)),
        psnr: MetricStats::from_values(results.iter().map(FilterResult::psnr)),
        filter_count: results.len(),
    })
}
