//! Worker thread management
//!
//! A `WorkerPool` owns N OS threads that all pop from one shared
//! `BlockingQueue<WorkItem>`. Each `Pixel` item is computed through the
//! shared `RenderContext` and written to the shared `PixelSink`; a `Stop`
//! item ends the thread that pops it. Shutdown pushes exactly one `Stop`
//! per worker, after all real work, and joins every thread.
//!
//! ```text
//!   driver ── submit(x, y) ──► BlockingQueue ──► worker 0 ─┐
//!                                     │        ──► worker 1 ─┼─► PixelSink
//!   shutdown_and_join ── Stop × N ───►┘        ──► worker N ─┘
//! ```
//!
//! Submitting work after `shutdown_and_join` is refused with
//! `PoolError::ShutDown`; work can't be cancelled once queued.

use crate::config::PoolConfig;
use crate::report::{FailureKind, PixelFailure, RenderReport};
use crossbeam_queue::SegQueue;
use log::{debug, error, warn};
use rtpool_core::{
    BlockingQueue, PixelSink, PoolError, PoolResult, RenderContext, Renderer, WorkItem,
};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

/// Per-worker state, readable from outside the worker
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Blocked in `pop` or about to be
    Idle = 0,
    /// Computing or writing one pixel
    Computing = 1,
    /// Received `Stop`; the thread has left its loop
    Terminated = 2,
}

impl WorkerState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => WorkerState::Idle,
            1 => WorkerState::Computing,
            _ => WorkerState::Terminated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Running,
    Joined,
}

/// State shared by the pool handle and every worker
struct Shared<R, S> {
    queue: BlockingQueue<WorkItem>,
    context: Arc<RenderContext<R>>,
    sink: Arc<S>,
    failures: SegQueue<PixelFailure>,
    states: Box<[AtomicU8]>,
}

impl<R: Renderer, S: PixelSink> Shared<R, S> {
    #[inline]
    fn set_state(&self, worker: usize, state: WorkerState) {
        self.states[worker].store(state as u8, Ordering::Release);
    }

    /// Compute and store one pixel. Returns false if a failure was recorded.
    fn render_pixel(&self, worker: usize, x: u32, y: u32) -> bool {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let color = self
                .context
                .compute(x, y)
                .map_err(|e| FailureKind::Compute(e.to_string()))?;
            self.sink.set(x, y, color).map_err(FailureKind::Write)
        }));

        let kind = match outcome {
            Ok(Ok(())) => return true,
            Ok(Err(kind)) => kind,
            Err(payload) => FailureKind::Panicked(panic_message(payload.as_ref())),
        };
        warn!("worker {}: pixel ({}, {}) failed: {}", worker, x, y, kind);
        self.failures.push(PixelFailure { x, y, worker, kind });
        false
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Worker thread main loop. Returns the number of pixels written.
fn worker_loop<R: Renderer, S: PixelSink>(shared: Arc<Shared<R, S>>, worker: usize) -> usize {
    debug!("worker {} started", worker);
    let mut rendered = 0;

    loop {
        match shared.queue.pop() {
            WorkItem::Pixel { x, y } => {
                shared.set_state(worker, WorkerState::Computing);
                if shared.render_pixel(worker, x, y) {
                    rendered += 1;
                }
                shared.set_state(worker, WorkerState::Idle);
            }
            WorkItem::Stop => break,
        }
    }

    shared.set_state(worker, WorkerState::Terminated);
    debug!("worker {} stopped after {} pixels", worker, rendered);
    rendered
}

/// Push one `Stop` per handle, then join them all in index order.
fn stop_and_join(
    queue: &BlockingQueue<WorkItem>,
    handles: Vec<JoinHandle<usize>>,
) -> Vec<thread::Result<usize>> {
    for _ in 0..handles.len() {
        queue.push(WorkItem::Stop);
    }
    handles.into_iter().map(JoinHandle::join).collect()
}

/// Fixed pool of render workers
pub struct WorkerPool<R, S>
where
    R: Renderer + 'static,
    S: PixelSink + 'static,
{
    shared: Arc<Shared<R, S>>,

    /// Join handles, emptied by `shutdown_and_join`
    handles: Vec<JoinHandle<usize>>,

    /// Pixel items accepted so far
    submitted: AtomicUsize,

    lifecycle: Lifecycle,

    started: Instant,
}

impl<R, S> WorkerPool<R, S>
where
    R: Renderer + 'static,
    S: PixelSink + 'static,
{
    /// Validate `config`, then spawn `config.num_workers` threads.
    ///
    /// Returns once every thread has been spawned. If the OS refuses one,
    /// the threads already running are stopped and joined before the
    /// error is returned.
    pub fn new(
        config: &PoolConfig,
        context: Arc<RenderContext<R>>,
        sink: Arc<S>,
    ) -> PoolResult<Self> {
        config.validate()?;

        let started = Instant::now();
        let num_workers = config.num_workers;
        let shared = Arc::new(Shared {
            queue: BlockingQueue::with_capacity(config.queue_capacity),
            context,
            sink,
            failures: SegQueue::new(),
            states: (0..num_workers)
                .map(|_| AtomicU8::new(WorkerState::Idle as u8))
                .collect(),
        });

        let mut handles = Vec::with_capacity(num_workers);
        for index in 0..num_workers {
            let mut builder =
                thread::Builder::new().name(format!("{}-{}", config.thread_name, index));
            if let Some(size) = config.stack_size {
                builder = builder.stack_size(size);
            }

            let worker_shared = Arc::clone(&shared);
            match builder.spawn(move || worker_loop(worker_shared, index)) {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    error!("failed to spawn worker {}: {}", index, source);
                    stop_and_join(&shared.queue, handles);
                    return Err(PoolError::Spawn { index, source });
                }
            }
        }

        debug!(
            "worker pool started: {} workers, {} samples per pixel",
            num_workers,
            shared.context.samples_per_pixel()
        );

        Ok(Self {
            shared,
            handles,
            submitted: AtomicUsize::new(0),
            lifecycle: Lifecycle::Running,
            started,
        })
    }

    /// Queue pixel (`x`, `y`).
    ///
    /// Each coordinate of the target should be submitted exactly once.
    /// Duplicates are not detected here; `Framebuffer` reports them as
    /// `AlreadyWritten` failures.
    pub fn submit(&self, x: u32, y: u32) -> PoolResult<()> {
        if self.is_joined() {
            return Err(PoolError::ShutDown);
        }
        self.shared.queue.push(WorkItem::pixel(x, y));
        self.submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Queue every coordinate from `coords`. Returns how many were queued.
    pub fn submit_all<I>(&self, coords: I) -> PoolResult<usize>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut count = 0;
        for (x, y) in coords {
            self.submit(x, y)?;
            count += 1;
        }
        Ok(count)
    }

    /// Send one `Stop` per worker, wait for all of them, collect failures.
    ///
    /// Blocks until every queued pixel has been processed. A second call
    /// returns `PoolError::AlreadyJoined` immediately.
    pub fn shutdown_and_join(&mut self) -> PoolResult<RenderReport> {
        if self.is_joined() {
            return Err(PoolError::AlreadyJoined);
        }
        self.lifecycle = Lifecycle::Joined;

        let handles = std::mem::take(&mut self.handles);
        debug!(
            "shutting down {} workers, {} items still queued",
            handles.len(),
            self.shared.queue.len()
        );

        let mut per_worker = Vec::with_capacity(handles.len());
        let mut panicked = None;
        for (index, result) in stop_and_join(&self.shared.queue, handles)
            .into_iter()
            .enumerate()
        {
            match result {
                Ok(count) => per_worker.push(count),
                Err(_) => {
                    error!("worker {} panicked outside pixel isolation", index);
                    self.shared.set_state(index, WorkerState::Terminated);
                    per_worker.push(0);
                    panicked.get_or_insert(index);
                }
            }
        }

        let mut failures: Vec<PixelFailure> =
            std::iter::from_fn(|| self.shared.failures.pop()).collect();
        failures.sort_by_key(|f| (f.y, f.x));

        let report = RenderReport {
            submitted: self.submitted.load(Ordering::Relaxed),
            rendered: per_worker.iter().sum(),
            per_worker,
            failures,
            elapsed: self.started.elapsed(),
        };
        debug!(
            "worker pool joined: {}/{} pixels rendered, {} failed, {:?}",
            report.rendered,
            report.submitted,
            report.failures.len(),
            report.elapsed
        );

        match panicked {
            Some(index) => Err(PoolError::WorkerPanicked(index)),
            None => Ok(report),
        }
    }

    /// Number of worker threads
    #[inline]
    pub fn num_workers(&self) -> usize {
        self.shared.states.len()
    }

    /// Items queued but not yet popped
    pub fn pending(&self) -> usize {
        self.shared.queue.len()
    }

    /// Workers currently blocked waiting for work
    pub fn waiting_workers(&self) -> usize {
        self.shared.queue.waiting()
    }

    /// Pixel items accepted by `submit`
    pub fn submitted(&self) -> usize {
        self.submitted.load(Ordering::Relaxed)
    }

    /// Snapshot of every worker's state
    pub fn worker_states(&self) -> Vec<WorkerState> {
        self.shared
            .states
            .iter()
            .map(|s| WorkerState::from_u8(s.load(Ordering::Acquire)))
            .collect()
    }

    #[inline]
    pub fn is_joined(&self) -> bool {
        self.lifecycle == Lifecycle::Joined
    }

    pub fn context(&self) -> &Arc<RenderContext<R>> {
        &self.shared.context
    }

    pub fn sink(&self) -> &Arc<S> {
        &self.shared.sink
    }
}

impl<R, S> Drop for WorkerPool<R, S>
where
    R: Renderer + 'static,
    S: PixelSink + 'static,
{
    fn drop(&mut self) {
        if self.is_joined() {
            return;
        }
        warn!("worker pool dropped while running, joining workers");
        match self.shutdown_and_join() {
            Ok(report) if !report.is_clean() => {
                warn!("{} pixel failures discarded on drop", report.failures.len());
            }
            Ok(_) => {}
            Err(e) => error!("worker pool teardown failed: {}", e),
        }
    }
}
