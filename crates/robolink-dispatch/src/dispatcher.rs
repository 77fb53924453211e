//! Fixed-cadence polling loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, trace};

use crate::{DispatchError, TickOutcome, Worker};

// ---------------------------------------------------------------------------
// Stop token
// ---------------------------------------------------------------------------

/// Cooperative stop flag shared between a loop and whoever controls it.
///
/// The loop checks the flag once per tick, before waiting. A stop that
/// arrives while the loop sleeps therefore lets one more tick run.
#[derive(Debug, Clone, Default)]
pub struct StopToken(Arc<AtomicBool>);

impl StopToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the loop to stop. Idempotent.
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Counters of a loop, returned when it is joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Ticks executed, idle ones included.
    pub ticks: u64,
    /// Ticks that took an item off the queue and published it.
    pub processed: u64,
    /// Ticks that took an item off the queue and published a failure.
    pub errors: u64,
}

impl LoopStats {
    fn record(&mut self, outcome: TickOutcome) {
        self.ticks += 1;
        match outcome {
            TickOutcome::Idle => {}
            TickOutcome::Processed => self.processed += 1,
            TickOutcome::Failed => self.errors += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Loop
// ---------------------------------------------------------------------------

/// Runs a [`Worker`] once per tick, with a fixed wait before each tick,
/// until stopped.
///
/// Ticks of one loop never overlap: the worker is owned by the loop and
/// called sequentially. Two loops share nothing except what their workers
/// share (the queues and publishers).
pub struct DispatchLoop<W: Worker> {
    worker: W,
    wait: Duration,
    stop: StopToken,
    stats: LoopStats,
}

impl<W: Worker> DispatchLoop<W> {
    /// Creates a loop that waits `wait` before each tick.
    pub fn new(worker: W, wait: Duration) -> Self {
        Self {
            worker,
            wait,
            stop: StopToken::new(),
            stats: LoopStats::default(),
        }
    }

    /// A handle to this loop's stop flag.
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// Runs one tick immediately, without waiting.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.worker.tick();
        self.stats.record(outcome);
        trace!(loop_name = W::NAME, tick = self.stats.ticks, ?outcome, "tick");
        outcome
    }

    /// Runs until a stop is requested and returns the final counters.
    ///
    /// The stop flag is checked at the top of each iteration; the sleep is
    /// never interrupted.
    pub async fn run(mut self) -> LoopStats {
        debug!(
            loop_name = W::NAME,
            wait_ms = self.wait.as_secs_f64() * 1000.0,
            "dispatch loop started"
        );

        while !self.stop.is_stop_requested() {
            if self.wait.is_zero() {
                // Don't starve other tasks on the same worker thread.
                tokio::task::yield_now().await;
            } else {
                time::sleep(self.wait).await;
            }
            self.tick();
        }

        debug!(
            loop_name = W::NAME,
            ticks = self.stats.ticks,
            processed = self.stats.processed,
            errors = self.stats.errors,
            "dispatch loop stopped"
        );
        self.stats
    }

    /// Spawns the loop on the current Tokio runtime.
    ///
    /// # Panics
    /// If called outside a Tokio runtime.
    pub fn spawn(self) -> LoopHandle {
        let stop = self.stop_token();
        LoopHandle {
            name: W::NAME,
            stop,
            task: tokio::spawn(self.run()),
        }
    }
}

/// Handle to a spawned [`DispatchLoop`].
#[derive(Debug)]
pub struct LoopHandle {
    name: &'static str,
    stop: StopToken,
    task: JoinHandle<LoopStats>,
}

impl LoopHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Asks the loop to stop at the start of its next tick.
    pub fn request_stop(&self) {
        debug!(loop_name = self.name, "stop requested");
        self.stop.request_stop();
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop.is_stop_requested()
    }

    /// Whether the loop task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits for the loop to exit. Does not request a stop by itself.
    ///
    /// # Errors
    /// `LoopFailed` if the loop task panicked or was aborted.
    pub async fn join(self) -> Result<LoopStats, DispatchError> {
        let name = self.name;
        self.task
            .await
            .map_err(|source| DispatchError::LoopFailed { name, source })
    }

    /// Requests a stop and waits for the loop to exit.
    ///
    /// # Errors
    /// `LoopFailed` if the loop task panicked or was aborted.
    pub async fn stop(self) -> Result<LoopStats, DispatchError> {
        self.request_stop();
        self.join().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);

    impl Worker for Counter {
        const NAME: &'static str = "counter";

        fn tick(&mut self) -> TickOutcome {
            self.0 += 1;
            if self.0 % 3 == 0 {
                TickOutcome::Failed
            } else {
                TickOutcome::Processed
            }
        }
    }

    #[test]
    fn test_stop_token_is_shared_between_clones() {
        let a = StopToken::new();
        let b = a.clone();
        assert!(!b.is_stop_requested());
        a.request_stop();
        assert!(b.is_stop_requested());
    }

    #[test]
    fn test_manual_ticks_update_stats() {
        let mut l = DispatchLoop::new(Counter(0), Duration::ZERO);
        for _ in 0..6 {
            l.tick();
        }
        assert_eq!(
            l.stats(),
            LoopStats {
                ticks: 6,
                processed: 4,
                errors: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_stop_before_start_runs_no_tick() {
        let l = DispatchLoop::new(Counter(0), Duration::from_millis(10));
        l.stop_token().request_stop();
        let stats = l.run().await;
        assert_eq!(stats.ticks, 0);
    }
}
