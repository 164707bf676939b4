//! Rolling volatility: population standard deviation over a trailing window.

use log::{debug, warn};

use crate::errors::EngineResult;
use crate::parallel::WorkerPool;
use crate::params::VolatilityParams;

/// Value written to slots that have no full window behind them.
pub const VOLATILITY_PAD: f64 = 0.0;

/// Population standard deviation of one window, two passes (mean, then
/// squared deviations).
#[inline]
fn window_std(span: &[f64]) -> f64 {
    let n = span.len() as f64;
    let mut sum = 0.0;
    for &x in span {
        sum += x;
    }
    let mean = sum / n;
    let mut sq_sum = 0.0;
    for &x in span {
        let diff = x - mean;
        sq_sum += diff * diff;
    }
    (sq_sum / n).sqrt()
}

/// Computes the rolling volatility of `input`.
///
/// Returns an empty vector when `input` is shorter than the window. Otherwise
/// the output has `input.len()` entries; the first `window - 1` are
/// [`VOLATILITY_PAD`] and entry `i` is the population standard deviation of
/// `input[i + 1 - window ..= i]`.
pub fn rolling_volatility(
    pool: &WorkerPool,
    input: &[f64],
    params: &VolatilityParams,
) -> EngineResult<Vec<f64>> {
    params.validate()?;
    let window = params.window;
    let n = input.len();
    if n < window {
        warn!("insufficient data for volatility: {} values, window {}", n, window);
        return Ok(Vec::new());
    }
    debug!(
        "rolling volatility: n={} window={} partitions={}",
        n,
        window,
        pool.partitions()
    );

    let mut out = vec![VOLATILITY_PAD; n];
    pool.fill_from(&mut out, window - 1, |i| window_std(&input[i + 1 - window..=i]));
    Ok(out)
}
