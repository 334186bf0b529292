//! Request Parameters
//!
//! Lenient coercion of the `/simulate` JSON body into a `SimulationRequest`,
//! with defaults for missing fields. Numbers may arrive as strings, flags as
//! numbers or words.

use serde_json::{Map, Value};
use thiserror::Error;

use portfolio_forecast::{
    PortfolioConfig, RequestDefaults, ShockKind, SimulationLimits, SimulationRequest, Tiered,
};

/// Coercion failures, reported to the client as 400
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParamError {
    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Malformed JSON body: {0}")]
    Malformed(String),

    #[error("'{name}' must be a number, got {found}")]
    NotANumber { name: String, found: String },

    #[error("'{name}' must be a non-negative integer, got {found}")]
    NotAnInteger { name: String, found: String },

    #[error("'{name}' must be a boolean, got {found}")]
    NotABoolean { name: String, found: String },

    #[error("'{name}' must be a string, got {found}")]
    NotAString { name: String, found: String },

    #[error("'{name}' is out of range: {reason}")]
    OutOfRange { name: String, reason: String },
}

/// Raw request fields keyed by wire name
#[derive(Clone, Debug, Default)]
pub struct RequestParams {
    fields: Map<String, Value>,
}

impl RequestParams {
    /// Parse a request body. An empty body means "all defaults".
    pub fn from_body(body: &str) -> Result<Self, ParamError> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value =
            serde_json::from_str(body).map_err(|e| ParamError::Malformed(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ParamError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            Value::Null => Ok(Self::default()),
            _ => Err(ParamError::NotAnObject),
        }
    }

    /// Field value, treating `null` as absent
    fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }

    pub fn number(&self, name: &str, default: f64) -> Result<f64, ParamError> {
        let Some(value) = self.get(name) else {
            return Ok(default);
        };
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        };
        parsed.ok_or_else(|| ParamError::NotANumber {
            name: name.into(),
            found: value.to_string(),
        })
    }

    pub fn integer(&self, name: &str, default: u64) -> Result<u64, ParamError> {
        match self.get(name) {
            None => Ok(default),
            Some(value) => as_integer(value).ok_or_else(|| ParamError::NotAnInteger {
                name: name.into(),
                found: value.to_string(),
            }),
        }
    }

    pub fn optional_integer(&self, name: &str) -> Result<Option<u64>, ParamError> {
        self.get(name)
            .map(|value| {
                as_integer(value).ok_or_else(|| ParamError::NotAnInteger {
                    name: name.into(),
                    found: value.to_string(),
                })
            })
            .transpose()
    }

    pub fn boolean(&self, name: &str, default: bool) -> Result<bool, ParamError> {
        let Some(value) = self.get(name) else {
            return Ok(default);
        };
        let parsed = match value {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|f| f != 0.0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" | "" => Some(false),
                _ => None,
            },
            _ => None,
        };
        parsed.ok_or_else(|| ParamError::NotABoolean {
            name: name.into(),
            found: value.to_string(),
        })
    }

    pub fn optional_str(&self, name: &str) -> Result<Option<&str>, ParamError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(ParamError::NotAString {
                name: name.into(),
                found: other.to_string(),
            }),
        }
    }

    fn tiered(&self, names: [&str; 3], defaults: Tiered<f64>) -> Result<Tiered<f64>, ParamError> {
        Ok(Tiered::new(
            self.number(names[0], defaults.low)?,
            self.number(names[1], defaults.medium)?,
            self.number(names[2], defaults.high)?,
        ))
    }

    /// Apply defaults and limits, producing an engine request.
    ///
    /// `sims` is clamped into the configured bounds; `years` above the
    /// maximum is rejected.
    pub fn to_request(
        &self,
        defaults: &RequestDefaults,
        limits: &SimulationLimits,
    ) -> Result<SimulationRequest, ParamError> {
        let years = self.integer("years", u64::from(defaults.years))?;
        if years == 0 || years > u64::from(limits.max_years) {
            return Err(ParamError::OutOfRange {
                name: "years".into(),
                reason: format!("{years} is not between 1 and {}", limits.max_years),
            });
        }

        let raw_sims = self.integer("sims", defaults.sims as u64)?;
        let sims = limits.clamp_sims(usize::try_from(raw_sims).unwrap_or(usize::MAX));
        if sims as u64 != raw_sims {
            tracing::debug!(requested = raw_sims, sims, "Clamped simulation count");
        }

        let shock = match self.optional_str("shock")? {
            None => None,
            Some(label) if label.trim().is_empty() => None,
            Some(label) => {
                let kind = ShockKind::from_label(label);
                if kind.is_none() {
                    tracing::warn!(shock = label, "Unknown shock type, ignoring");
                }
                kind
            }
        };

        Ok(SimulationRequest {
            wealth: self.number("wealth", defaults.wealth)?,
            portfolio: PortfolioConfig {
                weights: self.tiered(["w_low", "w_med", "w_high"], defaults.weights)?,
                mus: self.tiered(["mu_low", "mu_med", "mu_high"], defaults.mus)?,
                sigmas: self.tiered(["sigma_low", "sigma_med", "sigma_high"], defaults.sigmas)?,
            },
            years: u32::try_from(years).unwrap_or(u32::MAX),
            sims,
            shock,
            auto_shock: self.boolean("auto_shock", defaults.auto_shock)?,
            shock_prob: self.number("shock_prob", defaults.shock_prob)?,
            seed: self.optional_integer("seed")?,
        })
    }
}

/// Non-negative integer from a number, integral float or numeric string
fn as_integer(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn integral(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then(|| f as u64)
}
