mod bands;
mod partition;

pub use bands::run_bands;
pub use partition::{partition, WorkBand};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{MacrostackError, Result};

/// Build the fixed-size worker pool shared by ingestion and every band phase.
pub fn build_pool(threads: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(|i| format!("macrostack-worker-{i}"))
        .build()
        .map_err(|e| MacrostackError::ThreadPool(e.to_string()))
}
