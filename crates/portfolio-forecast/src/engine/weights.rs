//! Weight Normalization
//!
//! Rescales the three allocation weights so they sum to one.

use crate::model::Tiered;

/// Allocation used when the raw weights carry no usable mass
pub const FALLBACK_WEIGHTS: Tiered<f64> = Tiered::new(1.0, 0.0, 0.0);

/// Normalize raw weights to sum to 1.
///
/// A total `<= 0` collapses to 100% low-risk. Never divides by zero and
/// never fails.
pub fn normalize_weights(raw: Tiered<f64>) -> Tiered<f64> {
    let total = raw.sum();
    if total <= 0.0 {
        tracing::warn!(
            low = raw.low,
            medium = raw.medium,
            high = raw.high,
            "Allocation weights sum to {total}, falling back to 100% low-risk"
        );
        return FALLBACK_WEIGHTS;
    }

    raw.map(|w| w / total)
}
