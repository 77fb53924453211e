//! Fire-and-forget fan-out of loop results to any number of observers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

/// Publishes events to every live [`Subscription`].
///
/// Each subscriber gets its own unbounded channel, so a slow observer
/// never blocks the loop and never loses events. Subscribing is not
/// retroactive: a subscription sees only events published after it was
/// created.
///
/// Cloning a `Publisher` yields another handle to the same subscriber
/// list. Subscriptions end (`recv` returns `None`) once every handle has
/// been dropped.
pub struct Publisher<T> {
    subscribers: Arc<Mutex<Vec<mpsc::UnboundedSender<T>>>>,
}

impl<T: Clone> Publisher<T> {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Registers a new observer.
    pub fn subscribe(&self) -> Subscription<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().push(tx);
        Subscription { receiver: rx }
    }

    /// Delivers `event` to every live subscriber and returns how many
    /// received it. Subscriptions that were dropped are pruned here.
    pub fn publish(&self, event: T) -> usize {
        let mut subscribers = self.lock();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        subscribers.len()
    }

    /// Number of subscribers registered, including ones dropped since the
    /// last publish.
    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<mpsc::UnboundedSender<T>>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Clone for Publisher<T> {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl<T: Clone> Default for Publisher<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The receiving end of a [`Publisher`].
#[derive(Debug)]
pub struct Subscription<T> {
    receiver: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// Waits for the next event. Returns `None` once the publisher is gone
    /// and every pending event has been read.
    pub async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }

    /// Returns the next pending event without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_is_not_an_error() {
        let publisher: Publisher<u32> = Publisher::new();
        assert_eq!(publisher.publish(1), 0);
    }

    #[test]
    fn test_every_subscriber_gets_every_event() {
        let publisher = Publisher::new();
        let mut a = publisher.subscribe();
        let mut b = publisher.subscribe();

        assert_eq!(publisher.publish("x"), 2);
        assert_eq!(publisher.publish("y"), 2);

        assert_eq!(a.try_recv(), Some("x"));
        assert_eq!(a.try_recv(), Some("y"));
        assert_eq!(b.try_recv(), Some("x"));
        assert_eq!(b.try_recv(), Some("y"));
        assert_eq!(a.try_recv(), None);
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let publisher = Publisher::new();
        publisher.publish(1);
        let mut late = publisher.subscribe();
        publisher.publish(2);
        assert_eq!(late.try_recv(), Some(2));
        assert_eq!(late.try_recv(), None);
    }

    #[test]
    fn test_dropped_subscription_is_pruned() {
        let publisher = Publisher::new();
        let keep = publisher.subscribe();
        drop(publisher.subscribe());
        assert_eq!(publisher.subscriber_count(), 2);

        assert_eq!(publisher.publish(()), 1);
        assert_eq!(publisher.subscriber_count(), 1);
        drop(keep);
    }

    #[tokio::test]
    async fn test_recv_ends_when_publisher_dropped() {
        let publisher = Publisher::new();
        let mut sub = publisher.subscribe();
        publisher.publish(5);
        drop(publisher);
        assert_eq!(sub.recv().await, Some(5));
        assert_eq!(sub.recv().await, None);
    }
}
