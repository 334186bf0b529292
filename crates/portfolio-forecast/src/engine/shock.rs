//! Shock Overlay
//!
//! Crash/boom adjustments applied to the terminal batch, either to every
//! simulation (manual) or to a random subset (auto).

use rand::Rng;
use rand::distributions::Bernoulli;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::model::{ShockKind, ShockSummary, SimulationRequest};

/// Which shock mechanism a request selects
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShockPlan {
    /// Terminal wealth is left untouched
    None,

    /// One shock applied to every simulation
    Manual(ShockKind),

    /// Each simulation shocked independently with probability `prob`
    Auto { prob: f64 },
}

impl ShockPlan {
    /// A manual shock wins over the auto-shock flag.
    pub const fn from_request(request: &SimulationRequest) -> Self {
        match request.shock {
            Some(kind) => Self::Manual(kind),
            None if request.auto_shock => Self::Auto {
                prob: request.shock_prob,
            },
            None => Self::None,
        }
    }
}

/// Terminal wealth after the shock stage
#[derive(Clone, Debug, PartialEq)]
pub struct ShockOutcome {
    pub final_wealth: Vec<f64>,
    pub summary: ShockSummary,
}

/// Turns cumulative log-returns into shocked terminal wealth
pub struct ShockEngine<'a> {
    config: &'a EngineConfig,
}

impl<'a> ShockEngine<'a> {
    pub const fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Apply the request's shock plan to `log_returns`.
    ///
    /// Only the auto plan consumes randomness: one Bernoulli(`prob`) draw per
    /// simulation, then one fair crash/boom draw per shocked simulation, both
    /// in index order.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        request: &SimulationRequest,
        log_returns: &[f64],
        rng: &mut R,
    ) -> Result<ShockOutcome> {
        let wealth = request.wealth;
        let mut summary = ShockSummary::new(request.auto_shock);

        let final_wealth = match ShockPlan::from_request(request) {
            ShockPlan::None => grow(wealth, log_returns),

            ShockPlan::Manual(kind) => {
                let jump = self.config.shock_factor(kind).ln();
                summary.applied_to_all = true;
                summary.record(kind, log_returns.len());
                log_returns.iter().map(|r| wealth * (r + jump).exp()).collect()
            }

            ShockPlan::Auto { prob } => {
                let hit = Bernoulli::new(prob)?;
                let coin = Bernoulli::new(0.5)?;

                let mask: Vec<bool> = log_returns.iter().map(|_| rng.sample(hit)).collect();
                let kinds: Vec<Option<ShockKind>> = mask
                    .iter()
                    .map(|&shocked| {
                        shocked.then(|| {
                            if rng.sample(coin) {
                                ShockKind::Crash
                            } else {
                                ShockKind::Boom
                            }
                        })
                    })
                    .collect();

                for kind in kinds.iter().flatten() {
                    summary.record(*kind, 1);
                }

                grow(wealth, log_returns)
                    .into_iter()
                    .zip(&kinds)
                    .map(|(w, kind)| kind.map_or(w, |k| w * self.config.shock_factor(k)))
                    .collect()
            }
        };

        tracing::debug!(
            total_shocked = summary.total_shocked,
            count_crash = summary.count_crash,
            count_boom = summary.count_boom,
            applied_to_all = summary.applied_to_all,
            "Shock stage complete"
        );

        Ok(ShockOutcome {
            final_wealth,
            summary,
        })
    }
}

fn grow(wealth: f64, log_returns: &[f64]) -> Vec<f64> {
    log_returns.iter().map(|r| wealth * r.exp()).collect()
}
