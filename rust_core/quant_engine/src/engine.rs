use crate::errors::EngineResult;
use crate::fracdiff;
use crate::parallel::WorkerPool;
use crate::params::{EngineConfig, FracDiffParams, VolatilityParams};
use crate::volatility;
use crate::weights;

/// Entry point bundling a worker pool with the transforms.
///
/// An `Engine` holds no per-call state; one instance can serve concurrent
/// callers.
pub struct Engine {
    pool: WorkerPool,
}

impl Default for Engine {
    fn default() -> Self {
        Engine { pool: WorkerPool::global() }
    }
}

impl Engine {
    /// Engine with its own pool sized by `config`.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        Ok(Engine { pool: WorkerPool::new(&config)? })
    }

    pub fn with_workers(workers: usize) -> EngineResult<Self> {
        Engine::new(EngineConfig::with_workers(workers))
    }

    /// Number of partitions each call is split into.
    pub fn workers(&self) -> usize {
        self.pool.partitions()
    }

    pub fn rolling_volatility(&self, input: &[f64], window: usize) -> EngineResult<Vec<f64>> {
        volatility::rolling_volatility(&self.pool, input, &VolatilityParams::new(window))
    }

    pub fn fractional_diff(&self, input: &[f64], params: &FracDiffParams) -> EngineResult<Vec<f64>> {
        fracdiff::fractional_diff(&self.pool, input, params)
    }

    pub fn ffd_weights(&self, params: &FracDiffParams) -> EngineResult<Vec<f64>> {
        weights::ffd_weights(params)
    }
}
