//! Stress test - many workers, uneven pixels, repeated passes
//!
//! Each pass renders a grid where per-pixel cost varies by coordinate,
//! then checks that every slot was written exactly once and that
//! shutdown returned. Worker counts cycle through 1, 2, 7, 32 and 128.
//!
//! Usage: `stress [passes]` (default 20)

use rtpool::{env_get, render_image, BoxError, Color, PoolConfig, RenderContext};
use std::hint::black_box;
use std::time::Instant;

const WORKER_COUNTS: [usize; 5] = [1, 2, 7, 32, 128];

/// Busy loop whose length depends on the pixel
fn uneven(x: u32, y: u32, _samples: u32) -> Result<Color, BoxError> {
    let spins = ((x as u64 * 31 + y as u64 * 17) % 97) * 50;
    let mut acc = 0u64;
    for i in 0..spins {
        acc = black_box(acc.wrapping_mul(6364136223846793005).wrapping_add(i));
    }
    Ok(Color::gray((acc % 1000) as f64 / 1000.0))
}

/// Pixel count of a `width × height` grid, widened before multiplying
fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

fn main() {
    env_logger::init();
    println!("=== rtpool stress test ===\n");

    let passes: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);
    let width: u32 = env_get("RTP_WIDTH", 96);
    let height: u32 = env_get("RTP_HEIGHT", 64);

    let start = Instant::now();
    let mut failed_passes = 0;

    for pass in 0..passes {
        let workers = WORKER_COUNTS[pass % WORKER_COUNTS.len()];
        let config = PoolConfig::new().num_workers(workers);

        let pass_start = Instant::now();
        match render_image(&config, RenderContext::new(uneven, 1), width, height) {
            Ok((image, report)) => {
                let ok = image.is_complete()
                    && report.is_clean()
                    && report.rendered == pixel_count(width, height);
                if !ok {
                    failed_passes += 1;
                }
                let busiest = report.per_worker.iter().max().copied().unwrap_or(0);
                println!(
                    "pass {:>3}: {:>3} workers, {:>6} pixels, busiest worker {:>6}, {:>8.2?} {}",
                    pass,
                    workers,
                    report.rendered,
                    busiest,
                    pass_start.elapsed(),
                    if ok { "ok" } else { "FAILED" }
                );
            }
            Err(e) => {
                failed_passes += 1;
                println!("pass {:>3}: {:>3} workers, error: {}", pass, workers, e);
            }
        }
    }

    println!(
        "\n{} passes in {:.2?}, {} failed",
        passes,
        start.elapsed(),
        failed_passes
    );
    if failed_passes > 0 {
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_pixel_count_large_resolution() {
        assert_eq!(pixel_count(96, 64), 6144);
        assert_eq!(pixel_count(70_000, 70_000), 4_900_000_000);
    }

    #[test]
    fn test_uneven_at_extreme_coordinates() {
        let c = uneven(u32::MAX, u32::MAX, 1).unwrap();
        assert!((0.0..1.0).contains(&c.r));
        assert!(uneven(0, 0, 1).is_ok());
    }
}
