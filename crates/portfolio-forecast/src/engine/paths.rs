//! Chart Path Sampling
//!
//! Small batches of per-tier GBM price paths, downsampled to one point per
//! year. These exist for charting only and feed no statistic.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::config::EngineConfig;
use crate::model::{PortfolioConfig, Tiered};

/// Generates illustrative GBM trajectories
pub struct PathSampler<'a> {
    config: &'a EngineConfig,
}

impl<'a> PathSampler<'a> {
    pub const fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Simulate `sample_paths` daily GBM paths for one asset class.
    ///
    /// Each step applies the exact lognormal transition
    /// `S(t+1) = S(t) * exp((mu - 0.5*sigma^2)*dt + sigma*sqrt(dt)*Z)`.
    /// Returns one row per path with `years + 1` points taken at
    /// steps `0, spy, 2*spy, ...`.
    pub fn sample_asset<R: Rng + ?Sized>(
        &self,
        mu: f64,
        sigma: f64,
        years: u32,
        rng: &mut R,
    ) -> Vec<Vec<f64>> {
        let steps_per_year = self.config.steps_per_year as usize;
        let total_steps = years as usize * steps_per_year;
        let dt = 1.0 / f64::from(self.config.steps_per_year);
        let drift_term = (mu - 0.5 * sigma * sigma) * dt;
        let vol_term = sigma * dt.sqrt();

        let mut paths = Vec::with_capacity(self.config.sample_paths);
        for _ in 0..self.config.sample_paths {
            let mut level = self.config.sample_start_level;
            let mut yearly = Vec::with_capacity(years as usize + 1);
            yearly.push(level);

            for step in 1..=total_steps {
                let z: f64 = rng.sample(StandardNormal);
                level *= (drift_term + vol_term * z).exp();
                if step % steps_per_year == 0 {
                    yearly.push(level);
                }
            }

            paths.push(yearly);
        }
        paths
    }

    /// Weighted chart paths for the whole portfolio.
    ///
    /// Tiers are simulated separately (low, medium, high, in that draw
    /// order) and blended afterwards, so a displayed point is the weighted
    /// average of independent tier levels.
    pub fn sample_portfolio<R: Rng + ?Sized>(
        &self,
        portfolio: &PortfolioConfig,
        years: u32,
        rng: &mut R,
    ) -> Vec<Vec<f64>> {
        let (mus, sigmas) = (&portfolio.mus, &portfolio.sigmas);
        let low = self.sample_asset(mus.low, sigmas.low, years, rng);
        let medium = self.sample_asset(mus.medium, sigmas.medium, years, rng);
        let high = self.sample_asset(mus.high, sigmas.high, years, rng);

        low.iter()
            .zip(&medium)
            .zip(&high)
            .map(|((l, m), h)| {
                l.iter()
                    .zip(m)
                    .zip(h)
                    .map(|((&l, &m), &h)| portfolio.weights.dot(&Tiered::new(l, m, h)))
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    fn portfolio(weights: Tiered<f64>) -> PortfolioConfig {
        PortfolioConfig {
            weights,
            mus: Tiered::new(0.04, 0.08, 0.14),
            sigmas: Tiered::new(0.06, 0.15, 0.30),
        }
    }

    #[test]
    fn test_shape() {
        let config = EngineConfig::default();
        let sampler = PathSampler::new(&config);
        let mut rng = Pcg64::seed_from_u64(1);

        let paths = sampler.sample_portfolio(&portfolio(Tiered::new(0.4, 0.4, 0.2)), 5, &mut rng);
        assert_eq!(paths.len(), config.sample_paths);
        assert!(paths.iter().all(|p| p.len() == 6));
        assert!(paths.iter().all(|p| p[0] == 100.0));
    }

    #[test]
    fn test_zero_volatility_is_pure_drift() {
        let config = EngineConfig::default();
        let sampler = PathSampler::new(&config);
        let mut rng = Pcg64::seed_from_u64(3);

        let paths = sampler.sample_asset(0.05, 0.0, 2, &mut rng);
        for path in &paths {
            assert!((path[1] - 100.0 * 0.05_f64.exp()).abs() < 1e-9);
            assert!((path[2] - 100.0 * 0.10_f64.exp()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let config = EngineConfig::default();
        let sampler = PathSampler::new(&config);
        let p = portfolio(Tiered::new(0.2, 0.3, 0.5));

        let a = sampler.sample_portfolio(&p, 3, &mut Pcg64::seed_from_u64(42));
        let b = sampler.sample_portfolio(&p, 3, &mut Pcg64::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_blend_of_separate_tiers() {
        let config = EngineConfig {
            sample_paths: 4,
            ..Default::default()
        };
        let sampler = PathSampler::new(&config);
        let p = portfolio(Tiered::new(0.5, 0.25, 0.25));

        let blended = sampler.sample_portfolio(&p, 2, &mut Pcg64::seed_from_u64(9));

        let mut rng = Pcg64::seed_from_u64(9);
        let low = sampler.sample_asset(0.04, 0.06, 2, &mut rng);
        let med = sampler.sample_asset(0.08, 0.15, 2, &mut rng);
        let high = sampler.sample_asset(0.14, 0.30, 2, &mut rng);

        for i in 0..4 {
            for k in 0..3 {
                let expected = 0.5 * low[i][k] + 0.25 * med[i][k] + 0.25 * high[i][k];
                assert!((blended[i][k] - expected).abs() < 1e-9);
            }
        }
    }
}
