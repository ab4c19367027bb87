//! Work items handed from the driver to workers

/// One unit of work on the queue.
///
/// A worker keeps popping until it receives `Stop`, so shutting down `n`
/// workers takes exactly `n` stop items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkItem {
    /// Compute the pixel at (`x`, `y`)
    Pixel { x: u32, y: u32 },
    /// No more work for the worker that receives this
    Stop,
}

impl WorkItem {
    /// Pixel item for (`x`, `y`)
    #[inline]
    pub const fn pixel(x: u32, y: u32) -> Self {
        WorkItem::Pixel { x, y }
    }

    /// Check if this is the stop item
    #[inline]
    pub const fn is_stop(&self) -> bool {
        matches!(self, WorkItem::Stop)
    }
}
