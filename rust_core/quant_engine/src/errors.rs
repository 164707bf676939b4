use thiserror::Error;

/// Failures of a single transform call. Short input is not one of them: it
/// yields an empty (volatility) or all-NaN (differencing) series instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("fractional weights for d={d} did not drop below threshold {threshold} within {max_terms} terms")]
    NonConvergentWeights { d: f64, threshold: f64, max_terms: usize },

    #[error("worker pool: {0}")]
    WorkerPool(String),
}

impl EngineError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParameter { name, reason: reason.into() }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
