//! Blocking FIFO queue shared between the driver and the workers
//!
//! A `VecDeque` behind a mutex, plus a condition variable for consumers
//! that find it empty. `push` never waits for a consumer and `pop` never
//! gives up: it blocks until an item arrives. Shutdown is therefore the
//! caller's job (one stop item per consumer).

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// State guarded by the queue mutex
struct QueueState<T> {
    items: VecDeque<T>,
    /// Consumers currently blocked in `pop`
    waiting: usize,
}

/// Multi-producer, multi-consumer FIFO with blocking `pop`.
///
/// Items from a single producer are delivered in push order. Across
/// producers the interleaving is whatever the mutex hands out.
///
/// Growth goes through the global allocator; allocation failure aborts
/// the process.
pub struct BlockingQueue<T> {
    state: Mutex<QueueState<T>>,
    not_empty: Condvar,
}

impl<T> BlockingQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty queue with room for `capacity` items before growing
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity),
                waiting: 0,
            }),
            not_empty: Condvar::new(),
        }
    }

    /// Append `item` and wake one blocked consumer, if any.
    pub fn push(&self, item: T) {
        {
            let mut state = self.state.lock();
            state.items.push_back(item);
        }
        self.not_empty.notify_one();
    }

    /// Remove and return the head, blocking while the queue is empty.
    pub fn pop(&self) -> T {
        let mut state = self.state.lock();
        loop {
            if let Some(item) = state.items.pop_front() {
                return item;
            }
            state.waiting += 1;
            self.not_empty.wait(&mut state);
            state.waiting -= 1;
        }
    }

    /// Remove and return the head without blocking
    pub fn try_pop(&self) -> Option<T> {
        self.state.lock().items.pop_front()
    }

    /// Number of queued items
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of consumers currently blocked in `pop` (may be stale)
    pub fn waiting(&self) -> usize {
        self.state.lock().waiting
    }
}

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for BlockingQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BlockingQueue")
            .field("len", &state.items.len())
            .field("waiting", &state.waiting)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_fifo_single_producer() {
        let q = BlockingQueue::new();
        q.push('A');
        q.push('B');
        q.push('C');

        assert_eq!(q.len(), 3);
        assert_eq!(q.pop(), 'A');
        assert_eq!(q.pop(), 'B');
        assert_eq!(q.pop(), 'C');
        assert!(q.is_empty());
        assert_eq!(q.try_pop(), None);
    }

    #[test]
    fn test_pop_blocks_until_push() {
        let q = Arc::new(BlockingQueue::<u32>::new());
        let q2 = Arc::clone(&q);

        let start = Instant::now();
        let handle = thread::spawn(move || q2.pop());

        // Give the consumer time to block
        thread::sleep(Duration::from_millis(50));
        assert!(!handle.is_finished());
        q.push(42u32);

        assert_eq!(handle.join().unwrap(), 42);
        assert!(start.elapsed() >= Duration::from_millis(40));
    }

    #[test]
    fn test_waiting_count() {
        let q = Arc::new(BlockingQueue::<u32>::new());
        let consumers: Vec<_> = (0..3)
            .map(|_| {
                let q = Arc::clone(&q);
                thread::spawn(move || q.pop())
            })
            .collect();

        let deadline = Instant::now() + Duration::from_secs(5);
        while q.waiting() < 3 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(q.waiting(), 3);

        for i in 0..3 {
            q.push(i);
        }
        let mut got: Vec<u32> = consumers.into_iter().map(|h| h.join().unwrap()).collect();
        got.sort_unstable();
        assert_eq!(got, vec![0, 1, 2]);
        assert_eq!(q.waiting(), 0);
    }

    #[test]
    fn test_mpmc_delivers_everything_once() {
        const PRODUCERS: u64 = 4;
        const PER_PRODUCER: u64 = 1_000;

        let q = Arc::new(BlockingQueue::<Option<u64>>::new());

        let consumers: Vec<_> = (0..3)
            .map(|_| {
                let q = Arc::clone(&q);
                thread::spawn(move || {
                    let mut seen = Vec::new();
                    loop {
                        match q.pop() {
                            Some(v) => seen.push(v),
                            None => return seen,
                        }
                    }
                })
            })
            .collect();

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|p| {
                let q = Arc::clone(&q);
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        q.push(Some(p * PER_PRODUCER + i));
                    }
                })
            })
            .collect();
        for p in producers {
            p.join().unwrap();
        }
        for _ in 0..3 {
            q.push(None);
        }

        let mut all: Vec<u64> = consumers
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort_unstable();
        let expected: Vec<u64> = (0..PRODUCERS * PER_PRODUCER).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_per_producer_order_preserved() {
        let q = Arc::new(BlockingQueue::new());
        let producers: Vec<_> = (0..2u32)
            .map(|p| {
                let q = Arc::clone(&q);
                thread::spawn(move || {
                    for i in 0..500u32 {
                        q.push((p, i));
                    }
                })
            })
            .collect();
        for p in producers {
            p.join().unwrap();
        }

        let mut last = [None::<u32>; 2];
        while let Some((p, i)) = q.try_pop() {
            let slot = &mut last[p as usize];
            if let Some(prev) = *slot {
                assert!(i > prev, "producer {} out of order: {} after {}", p, i, prev);
            }
            *slot = Some(i);
        }
        assert_eq!(last, [Some(499), Some(499)]);
    }
}
