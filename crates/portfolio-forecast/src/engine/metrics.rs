//! Risk Metrics
//!
//! Reduces the terminal wealth batch into summary statistics.

use crate::config::EngineConfig;
use crate::model::RiskMetrics;

/// Summarize terminal wealth against the starting wealth.
pub fn aggregate(final_wealth: &[f64], initial_wealth: f64, config: &EngineConfig) -> RiskMetrics {
    RiskMetrics {
        expected: mean(final_wealth),
        prob_loss: share_below(final_wealth, initial_wealth),
        prob_ruin: share_below(final_wealth, config.ruin_threshold),
        var_5: percentile(final_wealth, config.var_percentile),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Fraction of values strictly below `threshold`
fn share_below(values: &[f64], threshold: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().filter(|&&v| v < threshold).count() as f64 / values.len() as f64
}

/// `q`-th percentile (0..=100) with linear interpolation between the two
/// nearest order statistics, rank `q/100 * (n - 1)`.
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
