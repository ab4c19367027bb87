//! Analytic test pattern used by the render driver
//!
//! Concentric rings over a checkerboard. Cheap, deterministic and uneven
//! enough (more samples near the rings look different) to show per-pixel
//! cost differences across workers.

use rtpool::{BoxError, Color, Renderer};

/// Pattern sized to the output resolution
pub struct RingPattern {
    width: u32,
    height: u32,
}

impl RingPattern {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn shade(&self, u: f64, v: f64) -> Color {
        let (du, dv) = (u - 0.5, v - 0.5);
        let d = (du * du + dv * dv).sqrt();
        let ring = 0.5 + 0.5 * (d * 48.0).cos();
        let checker = ((u * 8.0).floor() + (v * 8.0).floor()) as i64 & 1;

        Color::new(
            0.9 * ring,
            0.25 * ring + 0.5 * checker as f64,
            1.0 - 0.6 * u,
        )
        .clamped()
    }
}

/// Sample `i` of a 2D additive-recurrence sequence, in `[0, 1)²`
fn subpixel(i: u32) -> (f64, f64) {
    // Plastic-number constants
    const A1: f64 = 0.754_877_666_246_692_8;
    const A2: f64 = 0.569_840_290_998_053_2;
    let n = i as f64;
    ((0.5 + A1 * n).fract(), (0.5 + A2 * n).fract())
}

impl Renderer for RingPattern {
    fn compute_pixel(&self, x: u32, y: u32, samples: u32) -> Result<Color, BoxError> {
        if x >= self.width || y >= self.height {
            return Err(format!(
                "pixel ({}, {}) outside {}x{} view plane",
                x, y, self.width, self.height
            )
            .into());
        }

        let mut acc = Color::BLACK;
        for i in 0..samples {
            let (ox, oy) = subpixel(i);
            let u = (x as f64 + ox) / self.width as f64;
            let v = (y as f64 + oy) / self.height as f64;
            acc += self.shade(u, v);
        }
        Ok(acc / samples.max(1) as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_in_range() {
        let p = RingPattern::new(16, 16);
        for (x, y) in [(0, 0), (8, 8), (15, 3)] {
            let c = p.compute_pixel(x, y, 4).unwrap();
            for ch in [c.r, c.g, c.b] {
                assert!((0.0..=1.0).contains(&ch));
            }
        }
    }

    #[test]
    fn test_outside_view_plane_is_error() {
        let p = RingPattern::new(4, 4);
        assert!(p.compute_pixel(4, 0, 1).is_err());
    }

    #[test]
    fn test_zero_samples_is_black() {
        let p = RingPattern::new(4, 4);
        assert_eq!(p.compute_pixel(1, 2, 0).unwrap(), Color::BLACK);
    }
}
