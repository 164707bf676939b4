//! Static, contiguous partitioning of an output range across a rayon pool.
//!
//! Every transform in this crate has the same shape: the output slot `i`
//! depends only on a read-only window of the input ending at `i`. The pool
//! splits the computable tail of the output into `partitions` contiguous
//! slices of equal length (the last one may be shorter) and hands each slice
//! to one task. Slots are written exactly once, so the result does not depend
//! on how many partitions there are or which thread ran which slice.

use log::info;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::errors::{EngineError, EngineResult};
use crate::params::EngineConfig;

enum Threads {
    Global,
    Dedicated(ThreadPool),
}

pub struct WorkerPool {
    threads: Threads,
    partitions: usize,
}

pub fn hardware_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

impl WorkerPool {
    /// Runs on rayon's global pool, one partition per global thread.
    pub fn global() -> Self {
        WorkerPool {
            threads: Threads::Global,
            partitions: rayon::current_num_threads().max(1),
        }
    }

    /// Builds a dedicated pool. The thread count is capped at the hardware
    /// parallelism; the partition count is always the requested worker count.
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let hardware = hardware_threads();
        let partitions = config.workers.unwrap_or(hardware);
        let threads = partitions.min(hardware);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("quant-engine-{}", i))
            .build()
            .map_err(|e| EngineError::WorkerPool(e.to_string()))?;
        info!("worker pool ready: {} threads, {} partitions", threads, partitions);
        Ok(WorkerPool {
            threads: Threads::Dedicated(pool),
            partitions,
        })
    }

    pub fn partitions(&self) -> usize {
        self.partitions
    }

    pub fn threads(&self) -> usize {
        match &self.threads {
            Threads::Global => rayon::current_num_threads(),
            Threads::Dedicated(pool) => pool.current_num_threads(),
        }
    }

    /// Sets `out[i] = kernel(i)` for every `i` in `start..out.len()` and
    /// returns once all partitions have finished. Slots before `start` are
    /// left untouched.
    pub fn fill_from<F>(&self, out: &mut [f64], start: usize, kernel: F)
    where
        F: Fn(usize) -> f64 + Sync,
    {
        if start >= out.len() {
            return;
        }
        let tail = &mut out[start..];
        let chunk = partition_len(tail.len(), self.partitions);
        let kernel = &kernel;
        let mut run = move || {
            tail.par_chunks_mut(chunk)
                .enumerate()
                .for_each(|(part, slots)| {
                    let first = start + part * chunk;
                    for (offset, slot) in slots.iter_mut().enumerate() {
                        *slot = kernel(first + offset);
                    }
                })
        };
        match &self.threads {
            Threads::Global => run(),
            Threads::Dedicated(pool) => pool.install(run),
        }
    }
}

fn partition_len(len: usize, partitions: usize) -> usize {
    let partitions = partitions.clamp(1, len.max(1));
    (len + partitions - 1) / partitions
}
