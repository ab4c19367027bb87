//! Render driver
//!
//! Renders the ring pattern with a worker pool and prints timing and
//! coverage. No image is written.
//!
//! # Environment Variables
//!
//! - `RTP_WIDTH`, `RTP_HEIGHT` - Resolution (default 600x600)
//! - `RTP_SAMPLES` - Samples per pixel (default 1)
//! - `RTP_NUM_WORKERS` - Worker threads (default: CPU count)
//! - `RUST_LOG=debug` - Pool lifecycle logging

mod pattern;

use log::{error, info};
use pattern::RingPattern;
use rtpool::{env_get, render_image, Color, PoolConfig, RenderContext};
use std::process::ExitCode;

// RUST_LOG=debug RTP_SAMPLES=4 cargo run -p rtpool-render --release
fn main() -> ExitCode {
    env_logger::init();

    let width: u32 = env_get("RTP_WIDTH", 600);
    let height: u32 = env_get("RTP_HEIGHT", 600);
    let samples: u32 = env_get("RTP_SAMPLES", 1);
    let config = PoolConfig::from_env();

    println!("=== rtpool render ===\n");
    println!("resolution: {}x{}", width, height);
    println!("samples:    {}", samples);
    println!("workers:    {}", config.num_workers);

    let context = RenderContext::new(RingPattern::new(width, height), samples);
    let (image, report) = match render_image(&config, context, width, height) {
        Ok(done) => done,
        Err(e) => {
            error!("render failed: {}", e);
            eprintln!("render failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("\nTime = {:.3}s", report.elapsed.as_secs_f64());
    println!("rendered {}/{} pixels", report.rendered, report.submitted);
    for (worker, count) in report.per_worker.iter().enumerate() {
        info!("worker {}: {} pixels", worker, count);
    }
    for failure in &report.failures {
        println!("  {}", failure);
    }

    let missing = image.missing().len();
    let colors = image.into_colors(Color::BLACK);
    let mean = colors.iter().map(Color::luminance).sum::<f64>() / colors.len().max(1) as f64;
    println!("mean luminance: {:.4}", mean);

    if missing > 0 || !report.is_clean() {
        println!("{} pixels missing", missing);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
