//! RGB colour value produced per pixel

use std::ops::{Add, AddAssign, Div, Mul};

/// Linear RGB colour, one `f64` per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Self = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Color::new(1.0, 1.0, 1.0);

    #[inline]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Same value on all three channels
    #[inline]
    pub const fn gray(v: f64) -> Self {
        Self::new(v, v, v)
    }

    /// Rec. 709 relative luminance
    pub fn luminance(&self) -> f64 {
        0.2126 * self.r + 0.7152 * self.g + 0.0722 * self.b
    }

    /// Clamp every channel into `[0, 1]`
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Color) {
        *self = *self + rhs;
    }
}

impl Mul<f64> for Color {
    type Output = Color;

    fn mul(self, k: f64) -> Color {
        Color::new(self.r * k, self.g * k, self.b * k)
    }
}

impl Div<f64> for Color {
    type Output = Color;

    fn div(self, k: f64) -> Color {
        Color::new(self.r / k, self.g / k, self.b / k)
    }
}
