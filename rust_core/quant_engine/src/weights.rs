//! Fixed-width (FFD) fractional differencing weights.

use log::debug;

use crate::errors::{EngineError, EngineResult};
use crate::params::FracDiffParams;

/// Generates the truncated weight vector for order `d`.
///
/// Terms follow `w_k = -w_{k-1} / k * (d - k + 1)` starting from `w_0 = 1`.
/// Generation stops at the first term whose magnitude is below the
/// threshold; that term is dropped. The result is ordered oldest lag first,
/// so the last element is always `1.0`.
///
/// `|w_k|` may grow before it decays, decays very slowly for `-1 < d < 0`
/// and grows without bound below that, so the recurrence is bounded by
/// `params.max_terms` steps. The default cap also binds some convergent
/// pairs: `d = 0.05, threshold = 1e-8` needs about 2.3M steps.
pub fn ffd_weights(params: &FracDiffParams) -> EngineResult<Vec<f64>> {
    params.validate()?;
    let FracDiffParams { d, threshold, max_terms } = *params;

    let mut w = vec![1.0];
    let mut k = 1usize;
    loop {
        if k > max_terms {
            return Err(EngineError::NonConvergentWeights { d, threshold, max_terms });
        }
        let prev = w[w.len() - 1];
        let kf = k as f64;
        let w_k = -prev / kf * (d - kf + 1.0);
        // NaN never compares below the threshold and runs into the cap.
        if w_k.abs() < threshold {
            break;
        }
        w.push(w_k);
        k += 1;
    }
    w.reverse();
    debug!("ffd weights: d={} threshold={} width={}", d, threshold, w.len());
    Ok(w)
}
