//! Typed parameters for the transforms and the worker pool.

use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, EngineResult};

/// Upper bound on weight recurrence steps before giving up.
pub const DEFAULT_MAX_WEIGHT_TERMS: usize = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolatilityParams {
    pub window: usize,
}

impl Default for VolatilityParams {
    fn default() -> Self {
        VolatilityParams { window: 100 }
    }
}

impl VolatilityParams {
    pub fn new(window: usize) -> Self {
        VolatilityParams { window }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.window == 0 {
            return Err(EngineError::invalid("window", "must be >= 1, got 0"));
        }
        Ok(())
    }
}

/// Parameters of fixed-width fractional differentiation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FracDiffParams {
    pub d: f64,         // differentiation order
    pub threshold: f64, // weight magnitude cutoff
    #[serde(default = "default_max_terms")]
    pub max_terms: usize,
}

fn default_max_terms() -> usize {
    DEFAULT_MAX_WEIGHT_TERMS
}

impl Default for FracDiffParams {
    fn default() -> Self {
        FracDiffParams {
            d: 0.4,
            threshold: 1e-3,
            max_terms: DEFAULT_MAX_WEIGHT_TERMS,
        }
    }
}

impl FracDiffParams {
    pub fn new(d: f64, threshold: f64) -> Self {
        FracDiffParams { d, threshold, max_terms: DEFAULT_MAX_WEIGHT_TERMS }
    }

    pub fn with_max_terms(mut self, max_terms: usize) -> Self {
        self.max_terms = max_terms;
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        if !self.d.is_finite() {
            return Err(EngineError::invalid("d", format!("must be finite, got {}", self.d)));
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(EngineError::invalid(
                "threshold",
                format!("must be a positive finite number, got {}", self.threshold),
            ));
        }
        if self.max_terms == 0 {
            return Err(EngineError::invalid("max_terms", "must be >= 1, got 0"));
        }
        Ok(())
    }
}

/// Worker pool sizing. `workers: None` means one worker per hardware thread.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub workers: Option<usize>,
}

impl EngineConfig {
    pub fn with_workers(workers: usize) -> Self {
        EngineConfig { workers: Some(workers) }
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.workers == Some(0) {
            return Err(EngineError::invalid("workers", "must be >= 1, got 0"));
        }
        Ok(())
    }
}
