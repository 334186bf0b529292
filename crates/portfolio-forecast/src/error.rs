//! Error Types for Portfolio Forecast

use thiserror::Error;

/// Result type alias for forecast operations
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Forecast error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// A request field failed validation
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// A sampling distribution could not be constructed
    #[error("Distribution error: {0}")]
    Distribution(String),
}

impl ForecastError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Whether the caller supplied the bad input
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidParameter { name, reason } => {
                format!("Invalid value for '{name}': {reason}")
            }
            Self::Distribution(_) => "The simulation could not be set up.".into(),
        }
    }
}

impl From<rand::distributions::BernoulliError> for ForecastError {
    fn from(err: rand::distributions::BernoulliError) -> Self {
        Self::Distribution(err.to_string())
    }
}
