//! # rtpool-core
//!
//! Core types for the rtpool pixel scheduler.
//!
//! This crate owns no threads. Everything that spawns or joins workers
//! lives in `rtpool-runtime`.
//!
//! ## Modules
//!
//! - `queue` - Blocking MPMC FIFO used to hand work to workers
//! - `work` - Work item type (`Pixel` or `Stop`)
//! - `color` - RGB colour value
//! - `traits` - Renderer and pixel sink boundaries
//! - `context` - Shared read-only render context
//! - `buffer` - Write-once framebuffer
//! - `error` - Error types
//! - `env` - Environment variable utilities

pub mod queue;
pub mod work;
pub mod color;
pub mod traits;
pub mod context;
pub mod buffer;
pub mod error;
pub mod env;

// Re-exports for convenience
pub use queue::BlockingQueue;
pub use work::WorkItem;
pub use color::Color;
pub use traits::{PixelSink, Renderer};
pub use context::RenderContext;
pub use buffer::Framebuffer;
pub use error::{BoxError, ConfigError, PixelError, PoolError, PoolResult};
pub use env::{env_get, env_get_opt, env_get_str};

/// Limits shared by config defaults and validation
pub mod constants {
    /// Upper bound for the CPU-derived default worker count. Explicit
    /// counts are not capped.
    pub const MAX_DEFAULT_WORKERS: usize = 256;

    /// Smallest stack a worker may be given when a size is requested
    pub const MIN_STACK_SIZE: usize = 64 * 1024;
}
