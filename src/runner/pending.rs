//! Bounded, drop-on-full pending-work queue shared by workers.

use crossbeam_queue::SegQueue;
use std::sync::atomic::{AtomicU64, Ordering};

/// FIFO multi-producer/multi-consumer queue with a soft capacity bound.
///
/// At capacity, `push` drops the entry and bumps the drop counter instead
/// of blocking or evicting; producers never stall. The bound is checked
/// against the current length rather than reserved up front, so a large
/// capacity costs nothing until entries actually accumulate. Count is
/// conserved: pushes - drops = pops + remaining.
pub struct PendingQueue<T> {
    inner: SegQueue<T>,
    capacity: usize,
    dropped: AtomicU64,
}

impl<T> PendingQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: SegQueue::new(),
            capacity,
            dropped: AtomicU64::new(0),
        }
    }

    /// Returns false when the entry was dropped because the queue is full.
    pub fn push(&self, item: T) -> bool {
        if self.inner.len() >= self.capacity {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        self.inner.push(item);
        true
    }

    pub fn pop(&self) -> Option<T> {
        self.inner.pop()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Entries dropped at capacity since construction (or the last clear).
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Empties the queue between runs so a long-lived process does not
    /// leak state across independent tests.
    pub fn clear(&self) {
        while self.inner.pop().is_some() {}
        self.dropped.store(0, Ordering::Relaxed);
    }
}
