//! Unbounded FIFO queues shared between a producer and a dispatch loop.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A thread-safe, unbounded FIFO queue.
///
/// Cloning a `CommandQueue` yields another handle to the same queue: the
/// producer keeps one clone and the dispatch loop owns another. The lock
/// is held only for a single push or pop.
///
/// There is no capacity limit and no backpressure.
pub struct CommandQueue<T> {
    items: Arc<Mutex<VecDeque<T>>>,
}

impl<T> CommandQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Appends an item at the back.
    pub fn push(&self, item: T) {
        self.lock().push_back(item);
    }

    /// Removes the item at the front, or returns `None` immediately if the
    /// queue is empty. Never waits.
    pub fn pop(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Number of items waiting.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A producer that panicked mid-push leaves the deque intact, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Clone for CommandQueue<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T> Default for CommandQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CommandQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandQueue")
            .field("len", &self.len())
            .finish()
    }
}
