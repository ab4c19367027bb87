//! # rtpool-runtime
//!
//! Thread-owning half of rtpool.
//!
//! This crate provides:
//! - Worker pool lifecycle (spawn, feed, stop, join)
//! - Per-pixel failure isolation and reporting
//! - Pool configuration with environment overrides

pub mod config;
pub mod report;
pub mod worker;

// Re-exports
pub use config::PoolConfig;
pub use report::{FailureKind, PixelFailure, RenderReport};
pub use worker::{WorkerPool, WorkerState};
