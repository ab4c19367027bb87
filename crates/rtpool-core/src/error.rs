//! Error types for the pixel pool

use thiserror::Error;

/// Error type returned by renderers
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for pool operations
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors from creating, feeding or tearing down a worker pool
#[derive(Debug, Error)]
pub enum PoolError {
    /// Pool configuration rejected; no threads were spawned
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The OS refused to spawn a worker thread
    #[error("failed to spawn worker thread {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: std::io::Error,
    },

    /// Work submitted after shutdown started
    #[error("worker pool is shut down")]
    ShutDown,

    /// `shutdown_and_join` called on a pool that was already joined
    #[error("worker pool already joined")]
    AlreadyJoined,

    /// A worker thread died outside per-pixel isolation
    #[error("worker thread {0} panicked")]
    WorkerPanicked(usize),
}

/// Invalid pool or context settings
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("num_workers must be at least 1")]
    ZeroWorkers,

    #[error("stack_size {requested} is below minimum {min}")]
    StackTooSmall { requested: usize, min: usize },

    #[error("thread_name must not be empty")]
    EmptyThreadName,
}

/// Rejected pixel write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PixelError {
    #[error("pixel ({x}, {y}) outside {width}x{height} image")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    #[error("pixel ({x}, {y}) already written")]
    AlreadyWritten { x: u32, y: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = PoolError::from(ConfigError::ZeroWorkers);
        assert_eq!(e.to_string(), "invalid configuration: num_workers must be at least 1");

        let e = PixelError::OutOfBounds { x: 10, y: 2, width: 10, height: 10 };
        assert_eq!(e.to_string(), "pixel (10, 2) outside 10x10 image");
    }

    #[test]
    fn test_error_conversion() {
        let e: PoolError = ConfigError::StackTooSmall { requested: 1024, min: 65536 }.into();
        assert!(matches!(
            e,
            PoolError::Config(ConfigError::StackTooSmall { requested: 1024, min: 65536 })
        ));
    }
}
