//! Rayon thread pool sizing for campaign workloads.

use rayon::ThreadPoolBuilder;
use tracing::debug;

use crate::error::{Result, SimError};

/// How many worker threads run passes concurrently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerPool {
    /// 0 means the global rayon pool (one thread per core).
    pub workers: usize,
}

impl WorkerPool {
    pub fn with_workers(workers: usize) -> Self {
        Self { workers }
    }

    /// Run `f` with this pool as the rayon context. A dedicated pool is built only when a
    /// worker count was requested.
    pub fn install<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        if self.workers == 0 {
            return Ok(f());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|index| format!("campaign-worker-{index}"))
            .build()
            .map_err(|err| SimError::WorkerPool(err.to_string()))?;
        debug!(workers = self.workers, "dedicated campaign pool built");
        Ok(pool.install(f))
    }
}
