//! Write-once framebuffer
//!
//! Every slot is a `OnceLock<Color>`. Workers writing distinct pixels never
//! contend on a lock, and a second write to the same pixel is refused
//! instead of racing with the first.

use crate::color::Color;
use crate::error::PixelError;
use crate::traits::PixelSink;
use std::sync::OnceLock;

/// `width × height` grid of colours, row-major.
///
/// Cloning copies the written slots; unwritten slots stay unwritten.
#[derive(Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    slots: Box<[OnceLock<Color>]>,
}

impl Framebuffer {
    /// Allocate an unwritten buffer
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        let slots = (0..len).map(|_| OnceLock::new()).collect();
        Self { width, height, slots }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels in the grid
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Colour at (`x`, `y`), `None` if unwritten or out of range
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).and_then(|i| self.slots[i].get().copied())
    }

    /// Number of slots written so far
    pub fn written(&self) -> usize {
        self.slots.iter().filter(|s| s.get().is_some()).count()
    }

    /// True once every slot holds a colour
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|s| s.get().is_some())
    }

    /// Coordinates that were never written, row by row
    pub fn missing(&self) -> Vec<(u32, u32)> {
        let width = self.width as usize;
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.get().is_none())
            .map(|(i, _)| ((i % width) as u32, (i / width) as u32))
            .collect()
    }

    /// Row-major colours; unwritten slots become `fill`
    pub fn into_colors(self, fill: Color) -> Vec<Color> {
        self.slots
            .into_vec()
            .into_iter()
            .map(|s| s.into_inner().unwrap_or(fill))
            .collect()
    }
}

impl PixelSink for Framebuffer {
    fn set(&self, x: u32, y: u32, color: Color) -> Result<(), PixelError> {
        let i = self.index(x, y).ok_or(PixelError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;
        self.slots[i]
            .set(color)
            .map_err(|_| PixelError::AlreadyWritten { x, y })
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("written", &self.written())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_set_get() {
        let fb = Framebuffer::new(4, 3);
        assert_eq!(fb.len(), 12);
        assert_eq!(fb.get(1, 2), None);

        fb.set(1, 2, Color::gray(0.5)).unwrap();
        assert_eq!(fb.get(1, 2), Some(Color::gray(0.5)));
        assert_eq!(fb.written(), 1);
        assert!(!fb.is_complete());
    }

    #[test]
    fn test_second_write_rejected() {
        let fb = Framebuffer::new(2, 2);
        fb.set(0, 1, Color::WHITE).unwrap();
        assert_eq!(
            fb.set(0, 1, Color::BLACK),
            Err(PixelError::AlreadyWritten { x: 0, y: 1 })
        );
        // First value wins
        assert_eq!(fb.get(0, 1), Some(Color::WHITE));
    }

    #[test]
    fn test_out_of_bounds() {
        let fb = Framebuffer::new(2, 2);
        assert_eq!(
            fb.set(2, 0, Color::WHITE),
            Err(PixelError::OutOfBounds { x: 2, y: 0, width: 2, height: 2 })
        );
        assert_eq!(fb.get(0, 5), None);
    }

    #[test]
    fn test_missing_and_into_colors() {
        let fb = Framebuffer::new(3, 2);
        for (x, y) in [(0, 0), (1, 0), (2, 0), (0, 1)] {
            fb.set(x, y, Color::WHITE).unwrap();
        }
        assert_eq!(fb.missing(), vec![(1, 1), (2, 1)]);

        let colors = fb.into_colors(Color::BLACK);
        assert_eq!(colors.len(), 6);
        assert_eq!(colors[3], Color::WHITE);
        assert_eq!(colors[5], Color::BLACK);
    }

    #[test]
    fn test_clone_keeps_written_slots() {
        let fb = Arc::new(Framebuffer::new(2, 2));
        fb.set(1, 0, Color::WHITE).unwrap();
        let held = Arc::clone(&fb);

        // Another reference is alive, so this clones
        let owned = Arc::unwrap_or_clone(fb);
        assert_eq!(owned.get(1, 0), Some(Color::WHITE));
        assert_eq!(owned.missing(), vec![(0, 0), (0, 1), (1, 1)]);
        assert_eq!(
            owned.set(1, 0, Color::BLACK),
            Err(PixelError::AlreadyWritten { x: 1, y: 0 })
        );

        // The copy is independent of the original
        owned.set(0, 0, Color::WHITE).unwrap();
        assert_eq!(held.get(0, 0), None);
    }

    #[test]
    fn test_concurrent_disjoint_rows() {
        let fb = Arc::new(Framebuffer::new(64, 8));
        let handles: Vec<_> = (0..8u32)
            .map(|y| {
                let fb = Arc::clone(&fb);
                thread::spawn(move || {
                    for x in 0..64 {
                        fb.set(x, y, Color::new(x as f64, y as f64, 0.0)).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert!(fb.is_complete());
        assert_eq!(fb.get(63, 7), Some(Color::new(63.0, 7.0, 0.0)));
    }
}
