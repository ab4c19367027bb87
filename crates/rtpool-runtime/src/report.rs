//! Outcome of a render pass

use rtpool_core::PixelError;
use std::fmt;
use std::time::Duration;

/// Why a pixel has no colour
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The renderer returned an error
    Compute(String),
    /// The sink refused the write
    Write(PixelError),
    /// The renderer or sink panicked
    Panicked(String),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Compute(msg) => write!(f, "compute failed: {}", msg),
            FailureKind::Write(e) => write!(f, "write failed: {}", e),
            FailureKind::Panicked(msg) => write!(f, "panicked: {}", msg),
        }
    }
}

/// A pixel that a worker could not complete
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelFailure {
    pub x: u32,
    pub y: u32,
    /// Index of the worker that handled the item
    pub worker: usize,
    pub kind: FailureKind,
}

impl fmt::Display for PixelFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pixel ({}, {}) on worker {}: {}", self.x, self.y, self.worker, self.kind)
    }
}

/// Summary returned by `WorkerPool::shutdown_and_join`.
///
/// Every submitted item is accounted for: `rendered + failures.len() ==
/// submitted` whenever no worker thread died.
#[derive(Debug, Clone, Default)]
pub struct RenderReport {
    /// Pixel items accepted by `submit`
    pub submitted: usize,
    /// Pixels computed and written successfully
    pub rendered: usize,
    /// Successful pixels per worker, indexed by worker
    pub per_worker: Vec<usize>,
    /// Failed pixels, sorted by (y, x)
    pub failures: Vec<PixelFailure>,
    /// Time from pool start to the last join
    pub elapsed: Duration,
}

impl RenderReport {
    /// No pixel failed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failure recorded for (`x`, `y`), if any
    pub fn failed_at(&self, x: u32, y: u32) -> Option<&PixelFailure> {
        self.failures.iter().find(|f| f.x == x && f.y == y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_at() {
        let report = RenderReport {
            submitted: 2,
            rendered: 1,
            per_worker: vec![1],
            failures: vec![PixelFailure {
                x: 4,
                y: 1,
                worker: 0,
                kind: FailureKind::Compute("no hit".into()),
            }],
            elapsed: Duration::ZERO,
        };
        assert!(!report.is_clean());
        assert!(report.failed_at(4, 1).is_some());
        assert!(report.failed_at(1, 4).is_none());
        assert_eq!(
            report.failures[0].to_string(),
            "pixel (4, 1) on worker 0: compute failed: no hit"
        );
    }
}
