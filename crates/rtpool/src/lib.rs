//! # rtpool - per-pixel render scheduling
//!
//! Spreads the pixels of an image across a fixed set of OS threads. The
//! caller supplies the per-pixel computation (`Renderer`) and an output
//! (`PixelSink`, usually a `Framebuffer`); rtpool owns the threads, the
//! queue between them, and the shutdown protocol.
//!
//! ## Quick Start
//!
//! ```ignore
//! use rtpool::{render_image, BoxError, Color, PoolConfig, RenderContext};
//!
//! fn shade(x: u32, y: u32, _samples: u32) -> Result<Color, BoxError> {
//!     Ok(Color::new(x as f64 / 640.0, y as f64 / 480.0, 0.2))
//! }
//!
//! let config = PoolConfig::from_env().num_workers(4);
//! let (image, report) = render_image(&config, RenderContext::new(shade, 1), 640, 480)?;
//! assert!(image.is_complete() && report.is_clean());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │  Driver: render() / render_image() / your code   │
//! │       submit(x, y) × W·H, then shutdown_and_join │
//! └──────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────┐
//! │          BlockingQueue<WorkItem> (FIFO)          │
//! │        Pixel { x, y } ... Pixel, Stop × N        │
//! └──────────────────────────────────────────────────┘
//!          │               │               │
//!          ▼               ▼               ▼
//!    ┌───────────┐   ┌───────────┐   ┌───────────┐
//!    │  Worker 0 │   │  Worker 1 │   │  Worker N │
//!    └───────────┘   └───────────┘   └───────────┘
//!          │   RenderContext (shared, read-only)
//!          ▼               ▼               ▼
//!    ┌──────────────────────────────────────────────┐
//!    │     PixelSink / Framebuffer (write-once)     │
//!    └──────────────────────────────────────────────┘
//! ```

// Re-export core types
pub use rtpool_core::{
    BlockingQueue,
    BoxError,
    Color,
    ConfigError,
    Framebuffer,
    PixelError,
    PixelSink,
    PoolError,
    PoolResult,
    RenderContext,
    Renderer,
    WorkItem,
};

// Re-export env utilities
pub use rtpool_core::{env_get, env_get_opt, env_get_str};

// Re-export runtime types
pub use rtpool_runtime::{
    FailureKind,
    PixelFailure,
    PoolConfig,
    RenderReport,
    WorkerPool,
    WorkerState,
};

use log::info;
use std::sync::Arc;

/// Every coordinate of a `width × height` image, column by column.
pub fn pixel_coords(width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..width).flat_map(move |x| (0..height).map(move |y| (x, y)))
}

/// Render every pixel of `[0, width) × [0, height)` into `sink`.
///
/// Spawns a pool from `config`, submits each coordinate exactly once,
/// then shuts the pool down and returns its report.
pub fn render<R, S>(
    config: &PoolConfig,
    context: Arc<RenderContext<R>>,
    sink: Arc<S>,
    width: u32,
    height: u32,
) -> PoolResult<RenderReport>
where
    R: Renderer + 'static,
    S: PixelSink + 'static,
{
    let mut pool = WorkerPool::new(config, context, sink)?;
    let submitted = pool.submit_all(pixel_coords(width, height))?;
    info!(
        "submitted {} pixels ({}x{}) to {} workers",
        submitted,
        width,
        height,
        pool.num_workers()
    );
    pool.shutdown_and_join()
}

/// Render into a fresh `Framebuffer` and hand it back with the report.
pub fn render_image<R>(
    config: &PoolConfig,
    context: RenderContext<R>,
    width: u32,
    height: u32,
) -> PoolResult<(Framebuffer, RenderReport)>
where
    R: Renderer + 'static,
{
    let image = Arc::new(Framebuffer::new(width, height));
    let report = render(config, Arc::new(context), Arc::clone(&image), width, height)?;

    // The pool and its workers are gone, so this is the last reference
    Ok((Arc::unwrap_or_clone(image), report))
}
