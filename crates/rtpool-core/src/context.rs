//! Shared read-only render context

use crate::color::Color;
use crate::error::BoxError;
use crate::traits::Renderer;

/// Renderer plus the sample count every pixel is computed with.
///
/// One context is shared (behind an `Arc`) by all workers for the whole
/// pass. Nothing in the pool takes `&mut` to it.
#[derive(Debug, Clone)]
pub struct RenderContext<R> {
    renderer: R,
    samples_per_pixel: u32,
}

impl<R: Renderer> RenderContext<R> {
    pub fn new(renderer: R, samples_per_pixel: u32) -> Self {
        Self {
            renderer,
            samples_per_pixel,
        }
    }

    /// Compute pixel (`x`, `y`) with the context's sample count
    #[inline]
    pub fn compute(&self, x: u32, y: u32) -> Result<Color, BoxError> {
        self.renderer.compute_pixel(x, y, self.samples_per_pixel)
    }

    #[inline]
    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_passes_samples() {
        let ctx = RenderContext::new(
            |x: u32, y: u32, s: u32| -> Result<Color, BoxError> {
                Ok(Color::new(x as f64, y as f64, s as f64))
            },
            8,
        );
        assert_eq!(ctx.samples_per_pixel(), 8);
        assert_eq!(ctx.compute(1, 2).unwrap(), Color::new(1.0, 2.0, 8.0));
    }

    #[test]
    fn test_compute_error_passes_through() {
        let ctx = RenderContext::new(
            |_: u32, _: u32, _: u32| -> Result<Color, BoxError> { Err("bad scene".into()) },
            1,
        );
        let err = ctx.compute(0, 0).unwrap_err();
        assert_eq!(err.to_string(), "bad scene");
    }
}
