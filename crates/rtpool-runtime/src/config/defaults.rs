//! Library defaults for `PoolConfig`

use rtpool_core::constants::MAX_DEFAULT_WORKERS;

/// Worker thread name prefix; threads are named `{prefix}-{index}`
pub const THREAD_NAME: &str = "rtpool-worker";

/// Initial queue reservation (the queue still grows past this)
pub const QUEUE_CAPACITY: usize = 4096;

/// Stack size in bytes; 0 keeps the platform default
pub const STACK_SIZE: usize = 0;

/// Fallback worker count when available parallelism can't be queried
pub const FALLBACK_WORKERS: usize = 4;

/// One worker per available CPU, capped at `MAX_DEFAULT_WORKERS`
pub fn num_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(FALLBACK_WORKERS)
        .min(MAX_DEFAULT_WORKERS)
}
