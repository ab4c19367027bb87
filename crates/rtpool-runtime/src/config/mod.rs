//! Worker pool configuration
//!
//! Library defaults with runtime environment overrides.
//!
//! # Configuration Priority (highest wins)
//!
//! 1. Builder calls
//! 2. Environment variables (`from_env`)
//! 3. Library defaults (`defaults`)
//!
//! # Example
//!
//! ```rust,ignore
//! use rtpool_runtime::config::PoolConfig;
//!
//! let config = PoolConfig::from_env()
//!     .num_workers(8)
//!     .thread_name("render");
//! ```

pub mod defaults;

use rtpool_core::constants::MIN_STACK_SIZE;
use rtpool_core::env::{env_get, env_get_str};
use rtpool_core::ConfigError;

/// Worker pool configuration with builder pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads
    pub num_workers: usize,
    /// Worker thread name prefix
    pub thread_name: String,
    /// Worker stack size in bytes (`None` = platform default)
    pub stack_size: Option<usize>,
    /// Initial queue reservation
    pub queue_capacity: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl PoolConfig {
    /// Create config from library defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `RTP_NUM_WORKERS` - Number of worker threads
    /// - `RTP_THREAD_NAME` - Worker thread name prefix
    /// - `RTP_STACK_SIZE` - Worker stack size in bytes (0 = platform default)
    /// - `RTP_QUEUE_CAPACITY` - Initial queue reservation
    pub fn from_env() -> Self {
        let stack_size = env_get("RTP_STACK_SIZE", defaults::STACK_SIZE);
        Self {
            num_workers: env_get("RTP_NUM_WORKERS", defaults::num_workers()),
            thread_name: env_get_str("RTP_THREAD_NAME", defaults::THREAD_NAME),
            stack_size: (stack_size != 0).then_some(stack_size),
            queue_capacity: env_get("RTP_QUEUE_CAPACITY", defaults::QUEUE_CAPACITY),
        }
    }

    /// Create config with library defaults only (no env override).
    pub fn new() -> Self {
        Self {
            num_workers: defaults::num_workers(),
            thread_name: defaults::THREAD_NAME.to_string(),
            stack_size: None,
            queue_capacity: defaults::QUEUE_CAPACITY,
        }
    }

    // Builder methods

    pub fn num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = Some(size);
        self
    }

    pub fn queue_capacity(mut self, cap: usize) -> Self {
        self.queue_capacity = cap;
        self
    }

    /// Validate configuration and return the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if let Some(size) = self.stack_size {
            if size < MIN_STACK_SIZE {
                return Err(ConfigError::StackTooSmall {
                    requested: size,
                    min: MIN_STACK_SIZE,
                });
            }
        }
        if self.thread_name.is_empty() {
            return Err(ConfigError::EmptyThreadName);
        }
        Ok(())
    }
}
