//! Collaborator boundaries
//!
//! The pool knows nothing about scenes, cameras or image formats. It only
//! needs something that turns a coordinate into a colour (`Renderer`) and
//! somewhere to put that colour (`PixelSink`).

use crate::color::Color;
use crate::error::{BoxError, PixelError};

/// Per-pixel computation.
///
/// Called concurrently from every worker with the same `&self` and
/// different coordinates, so implementations must not rely on interior
/// mutation without their own synchronization.
pub trait Renderer: Send + Sync {
    /// Compute the colour of pixel (`x`, `y`) using `samples` samples.
    fn compute_pixel(&self, x: u32, y: u32, samples: u32) -> Result<Color, BoxError>;
}

impl<F> Renderer for F
where
    F: Fn(u32, u32, u32) -> Result<Color, BoxError> + Send + Sync,
{
    fn compute_pixel(&self, x: u32, y: u32, samples: u32) -> Result<Color, BoxError> {
        self(x, y, samples)
    }
}

/// Destination for computed pixels.
///
/// Must accept concurrent `set` calls for distinct coordinates. Nothing is
/// required of an implementation for two writes to the same coordinate;
/// `Framebuffer` rejects the second one.
pub trait PixelSink: Send + Sync {
    /// Store `color` at (`x`, `y`).
    fn set(&self, x: u32, y: u32, color: Color) -> Result<(), PixelError>;
}
