//! Domain Models
//!
//! Request, portfolio and result types for a single forecast run.
//! Everything here is created per request and never shared between runs.

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// The three risk tiers of the portfolio
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetClass {
    Low,
    Medium,
    High,
}

impl AssetClass {
    /// All tiers in canonical order (also the chart-path draw order)
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];
}

/// One value per asset class
///
/// Serializes as `{"low": .., "medium": .., "high": ..}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Tiered<T> {
    pub low: T,
    pub medium: T,
    pub high: T,
}

impl<T> Tiered<T> {
    pub const fn new(low: T, medium: T, high: T) -> Self {
        Self { low, medium, high }
    }

    pub const fn get(&self, class: AssetClass) -> &T {
        match class {
            AssetClass::Low => &self.low,
            AssetClass::Medium => &self.medium,
            AssetClass::High => &self.high,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Tiered<U> {
        Tiered {
            low: f(self.low),
            medium: f(self.medium),
            high: f(self.high),
        }
    }

    /// Iterate `(class, value)` in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (AssetClass, &T)> {
        AssetClass::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

impl Tiered<f64> {
    pub fn sum(&self) -> f64 {
        self.low + self.medium + self.high
    }

    /// Weighted sum `Σ self[c] * other[c]`
    pub fn dot(&self, other: &Self) -> f64 {
        self.low * other.low + self.medium * other.medium + self.high * other.high
    }
}

/// Allocation and per-tier GBM parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Allocation weights (raw until normalized)
    pub weights: Tiered<f64>,

    /// Annualized drift per tier
    pub mus: Tiered<f64>,

    /// Annualized volatility per tier
    pub sigmas: Tiered<f64>,
}

/// Direction of a discrete market shock
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShockKind {
    Crash,
    Boom,
}

impl ShockKind {
    /// Parse the wire label; only the exact strings `"crash"` and `"boom"` match
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "crash" => Some(Self::Crash),
            "boom" => Some(Self::Boom),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Crash => "crash",
            Self::Boom => "boom",
        }
    }
}

/// A fully defaulted simulation request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Starting wealth
    pub wealth: f64,

    /// Allocation and asset parameters
    pub portfolio: PortfolioConfig,

    /// Horizon in whole years
    pub years: u32,

    /// Number of Monte Carlo simulations
    pub sims: usize,

    /// Manual shock applied to every simulation; overrides auto-shock
    pub shock: Option<ShockKind>,

    /// Per-simulation random shocks
    pub auto_shock: bool,

    /// Probability that a single simulation is shocked
    pub shock_prob: f64,

    /// RNG seed (None = nondeterministic)
    pub seed: Option<u64>,
}

impl SimulationRequest {
    /// Reject inputs the engine cannot simulate meaningfully.
    ///
    /// Weights are not checked for sign here; a non-positive total is
    /// handled by the normalizer's fallback.
    pub fn validate(&self) -> Result<()> {
        if !self.wealth.is_finite() || self.wealth <= 0.0 {
            return Err(ForecastError::invalid("wealth", "must be a positive number"));
        }
        if self.years == 0 {
            return Err(ForecastError::invalid("years", "must be at least 1"));
        }
        if self.sims == 0 {
            return Err(ForecastError::invalid("sims", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.shock_prob) {
            return Err(ForecastError::invalid(
                "shock_prob",
                format!("{} is outside [0, 1]", self.shock_prob),
            ));
        }

        let p = &self.portfolio;
        for (class, w) in p.weights.iter() {
            if !w.is_finite() {
                return Err(ForecastError::invalid(weight_name(class), "must be finite"));
            }
        }
        for (class, mu) in p.mus.iter() {
            if !mu.is_finite() {
                return Err(ForecastError::invalid(mu_name(class), "must be finite"));
            }
        }
        for (class, sigma) in p.sigmas.iter() {
            if !sigma.is_finite() || *sigma < 0.0 {
                return Err(ForecastError::invalid(
                    sigma_name(class),
                    "must be a non-negative number",
                ));
            }
        }

        Ok(())
    }
}

const fn weight_name(class: AssetClass) -> &'static str {
    match class {
        AssetClass::Low => "w_low",
        AssetClass::Medium => "w_med",
        AssetClass::High => "w_high",
    }
}

const fn mu_name(class: AssetClass) -> &'static str {
    match class {
        AssetClass::Low => "mu_low",
        AssetClass::Medium => "mu_med",
        AssetClass::High => "mu_high",
    }
}

const fn sigma_name(class: AssetClass) -> &'static str {
    match class {
        AssetClass::Low => "sigma_low",
        AssetClass::Medium => "sigma_med",
        AssetClass::High => "sigma_high",
    }
}

/// What the shock stage did to the batch
///
/// `count_crash + count_boom == total_shocked` always holds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShockSummary {
    pub auto_shock: bool,
    pub applied_to_all: bool,
    pub total_shocked: usize,
    pub count_crash: usize,
    pub count_boom: usize,
}

impl ShockSummary {
    pub fn new(auto_shock: bool) -> Self {
        Self {
            auto_shock,
            ..Default::default()
        }
    }

    pub(crate) fn record(&mut self, kind: ShockKind, count: usize) {
        match kind {
            ShockKind::Crash => self.count_crash += count,
            ShockKind::Boom => self.count_boom += count,
        }
        self.total_shocked += count;
    }
}

/// Terminal-wealth risk statistics
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Mean terminal wealth
    pub expected: f64,

    /// Share of outcomes below initial wealth
    pub prob_loss: f64,

    /// Share of outcomes below the ruin threshold
    pub prob_ruin: f64,

    /// 5th-percentile terminal wealth (a wealth level, not a loss)
    #[serde(rename = "VaR_5")]
    pub var_5: f64,
}

/// Output of one forecast run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Chart paths, one row per path, `years + 1` yearly points each
    pub sample_paths: Vec<Vec<f64>>,

    /// Terminal wealth of every simulation
    pub final_wealth_samples: Vec<f64>,

    #[serde(flatten)]
    pub metrics: RiskMetrics,

    pub shock_summary: ShockSummary,

    /// Normalized weights actually used
    pub weights: Tiered<f64>,

    pub mus: Tiered<f64>,

    pub sigmas: Tiered<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SimulationRequest {
        SimulationRequest {
            wealth: 10_000.0,
            portfolio: PortfolioConfig {
                weights: Tiered::new(0.4, 0.4, 0.2),
                mus: Tiered::new(0.04, 0.08, 0.14),
                sigmas: Tiered::new(0.06, 0.15, 0.30),
            },
            years: 1,
            sims: 100,
            shock: None,
            auto_shock: true,
            shock_prob: 0.05,
            seed: Some(7),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_fields() {
        let mut r = request();
        r.wealth = 0.0;
        assert!(matches!(
            r.validate(),
            Err(ForecastError::InvalidParameter { name: "wealth", .. })
        ));

        let mut r = request();
        r.shock_prob = 1.5;
        assert!(r.validate().is_err());

        let mut r = request();
        r.portfolio.sigmas.high = -0.1;
        assert!(matches!(
            r.validate(),
            Err(ForecastError::InvalidParameter { name: "sigma_high", .. })
        ));

        let mut r = request();
        r.years = 0;
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_negative_weights_are_not_errors() {
        let mut r = request();
        r.portfolio.weights = Tiered::new(-1.0, 0.0, 0.0);
        assert!(r.validate().is_ok());
    }

    #[test]
    fn test_shock_labels() {
        assert_eq!(ShockKind::from_label("crash"), Some(ShockKind::Crash));
        assert_eq!(ShockKind::from_label("boom"), Some(ShockKind::Boom));
        assert_eq!(ShockKind::from_label(" Boom "), None);
        assert_eq!(ShockKind::from_label("CRASH"), None);
        assert_eq!(ShockKind::from_label("meteor"), None);
    }

    #[test]
    fn test_summary_record() {
        let mut s = ShockSummary::new(true);
        s.record(ShockKind::Crash, 3);
        s.record(ShockKind::Boom, 2);
        assert_eq!(s.total_shocked, 5);
        assert_eq!(s.count_crash + s.count_boom, s.total_shocked);
    }

    #[test]
    fn test_result_wire_names() {
        let result = SimulationResult {
            sample_paths: vec![vec![100.0, 101.0]],
            final_wealth_samples: vec![10_000.0],
            metrics: RiskMetrics {
                expected: 10_000.0,
                prob_loss: 0.0,
                prob_ruin: 0.0,
                var_5: 10_000.0,
            },
            shock_summary: ShockSummary::new(false),
            weights: Tiered::new(1.0, 0.0, 0.0),
            mus: Tiered::default(),
            sigmas: Tiered::default(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["VaR_5"], 10_000.0);
        assert_eq!(json["expected"], 10_000.0);
        assert_eq!(json["weights"]["low"], 1.0);
        assert_eq!(json["shock_summary"]["applied_to_all"], false);
        assert!(json.get("metrics").is_none());
    }
}
