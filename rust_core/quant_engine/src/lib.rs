//! quant_engine_core
//!
//! Parallel windowed transforms over dense `f64` series:
//!
//! * rolling volatility (population standard deviation over a trailing window),
//! * fixed-width fractional differencing with threshold-truncated weights.
//!
//! Each output slot is computed from a read-only window of the input, so the
//! valid output range is split into contiguous partitions and filled on a
//! rayon pool. Results are bit-identical for any number of workers.
//!
//! The free functions below run on rayon's global pool. Use [`Engine`] for a
//! dedicated pool of a chosen size.

pub mod engine;
pub mod errors;
pub mod fracdiff;
pub mod parallel;
pub mod params;
pub mod volatility;
pub mod weights;

pub use engine::Engine;
pub use errors::{EngineError, EngineResult};
pub use fracdiff::UNDEFINED;
pub use params::{EngineConfig, FracDiffParams, VolatilityParams, DEFAULT_MAX_WEIGHT_TERMS};
pub use volatility::VOLATILITY_PAD;

use parallel::WorkerPool;

/// Rolling volatility of `series`; empty when `series.len() < window`.
pub fn calculate_volatility(series: &[f64], window: usize) -> EngineResult<Vec<f64>> {
    volatility::rolling_volatility(&WorkerPool::global(), series, &VolatilityParams::new(window))
}

/// Fractionally differenced `series` with NaN where history is insufficient.
///
/// Uses the default weight cap of [`DEFAULT_MAX_WEIGHT_TERMS`] recurrence
/// steps and fails with [`EngineError::NonConvergentWeights`] beyond it; see
/// [`FracDiffParams::with_max_terms`] and [`Engine::fractional_diff`] to
/// raise it.
pub fn fractional_diff(series: &[f64], d: f64, threshold: f64) -> EngineResult<Vec<f64>> {
    fracdiff::fractional_diff(&WorkerPool::global(), series, &FracDiffParams::new(d, threshold))
}

/// FFD weights, oldest lag first, ending in `1.0`.
///
/// Bounded by [`DEFAULT_MAX_WEIGHT_TERMS`] recurrence steps, like
/// [`fractional_diff`].
pub fn get_weights_ffd(d: f64, threshold: f64) -> EngineResult<Vec<f64>> {
    weights::ffd_weights(&FracDiffParams::new(d, threshold))
}
