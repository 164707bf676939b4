//! Fixed-width fractional differencing (FFD).

use log::{debug, warn};

use crate::errors::EngineResult;
use crate::parallel::WorkerPool;
use crate::params::FracDiffParams;
use crate::weights::ffd_weights;

/// Marker for positions without enough history to be differenced.
pub const UNDEFINED: f64 = f64::NAN;

#[inline]
fn dot(weights: &[f64], span: &[f64]) -> f64 {
    let mut acc = 0.0;
    for (w, x) in weights.iter().zip(span) {
        acc += w * x;
    }
    acc
}

/// Convolves `input` with the FFD weights for `params`.
///
/// The output always has `input.len()` entries. With `width` weights, the
/// first `width - 1` are [`UNDEFINED`]; if the input is shorter than `width`
/// every entry is.
///
/// Weight generation stops after `params.max_terms` steps
/// ([`DEFAULT_MAX_WEIGHT_TERMS`](crate::params::DEFAULT_MAX_WEIGHT_TERMS) by
/// default). Small `d` with a very small threshold can need more than that,
/// e.g. `d = 0.05, threshold = 1e-8` takes about 2.3M steps; raise
/// `max_terms` for such pairs.
pub fn fractional_diff(
    pool: &WorkerPool,
    input: &[f64],
    params: &FracDiffParams,
) -> EngineResult<Vec<f64>> {
    let weights = ffd_weights(params)?;
    Ok(apply_weights(pool, input, &weights))
}

fn apply_weights(pool: &WorkerPool, input: &[f64], weights: &[f64]) -> Vec<f64> {
    let n = input.len();
    let width = weights.len();
    let mut out = vec![UNDEFINED; n];
    if n < width {
        warn!(
            "insufficient data for fractional diff: {} values, weight width {}",
            n, width
        );
        return out;
    }
    debug!(
        "fractional diff: n={} width={} partitions={}",
        n,
        width,
        pool.partitions()
    );
    pool.fill_from(&mut out, width - 1, |i| dot(weights, &input[i + 1 - width..=i]));
    out
}
