//! `RobotCommandManager`: the two queues, the two loops and their observers.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use robolink_dispatch::{
    CommandQueue, DispatchConfig, DispatchError, DispatchLoop, InboundWorker, LoopHandle,
    LoopStats, OutboundWorker, Publisher, ReceivedEvent, SentEvent, Subscription,
};
use robolink_protocol::Message;
use tracing::{debug, info};

/// Counters of both loops, returned by [`RobotCommandManager::shutdown`].
///
/// A loop that was never started reports all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    pub outbound: LoopStats,
    pub inbound: LoopStats,
}

/// Owns the outbound and inbound pipelines.
///
/// Application code enqueues [`Message`]s to send and raw tokens read from
/// the robot; the two loops drain them at their configured cadence and
/// publish the results to whoever subscribed. Everything is passed in or
/// created here, there is no global instance.
///
/// # Example
///
/// ```rust,no_run
/// use robolink::prelude::*;
///
/// # async fn run() -> Result<(), RobolinkError> {
/// let manager = RobotCommandManager::new(DispatchConfig::default());
/// let mut sent = manager.subscribe_sent();
/// manager.start()?;
///
/// manager.enqueue_outbound(Message::movement(Direction::Up, true));
/// if let Some(event) = sent.recv().await {
///     println!("sent {}", event.wire);
/// }
/// manager.shutdown().await?;
/// # Ok(())
/// # }
/// ```
pub struct RobotCommandManager {
    config: DispatchConfig,
    outbound: CommandQueue<Message>,
    inbound: CommandQueue<String>,
    sent: Publisher<SentEvent>,
    received: Publisher<ReceivedEvent>,
    outbound_loop: Mutex<Option<LoopHandle>>,
    inbound_loop: Mutex<Option<LoopHandle>>,
}

impl Default for RobotCommandManager {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}

impl RobotCommandManager {
    /// Creates a manager with both loops stopped.
    ///
    /// Out-of-range waits in `config` are clamped.
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config: config.validated(),
            outbound: CommandQueue::new(),
            inbound: CommandQueue::new(),
            sent: Publisher::new(),
            received: Publisher::new(),
            outbound_loop: Mutex::new(None),
            inbound_loop: Mutex::new(None),
        }
    }

    pub fn config(&self) -> DispatchConfig {
        self.config
    }

    /// Queues a message for the robot.
    ///
    /// Payloads are validated when the message is built, so anything that
    /// reaches this point encodes.
    pub fn enqueue_outbound(&self, message: Message) {
        self.outbound.push(message);
    }

    /// Queues a raw token read from the robot for classification.
    pub fn enqueue_inbound(&self, token: impl Into<String>) {
        self.inbound.push(token.into());
    }

    pub fn outbound_len(&self) -> usize {
        self.outbound.len()
    }

    pub fn inbound_len(&self) -> usize {
        self.inbound.len()
    }

    /// Subscribes to messages taken off the outbound queue and encoded.
    ///
    /// Only events published after this call are delivered.
    pub fn subscribe_sent(&self) -> Subscription<SentEvent> {
        self.sent.subscribe()
    }

    /// Subscribes to classified inbound tokens, rejections included.
    ///
    /// Only events published after this call are delivered.
    pub fn subscribe_received(&self) -> Subscription<ReceivedEvent> {
        self.received.subscribe()
    }

    /// Starts the outbound loop with the given inter-tick wait.
    ///
    /// A loop that was asked to stop keeps its slot until it exits, which
    /// takes up to one wait. Restart it after [`shutdown`](Self::shutdown).
    ///
    /// # Errors
    /// `AlreadyRunning` if the outbound loop is running, `Stopping` if it
    /// was asked to stop but has not exited yet.
    ///
    /// # Panics
    /// If called outside a Tokio runtime.
    pub fn start_outbound(&self, wait: Duration) -> Result<(), DispatchError> {
        let worker = OutboundWorker::new(self.outbound.clone(), self.sent.clone());
        start_loop(&self.outbound_loop, || DispatchLoop::new(worker, wait).spawn())
    }

    /// Starts the inbound loop with the given inter-tick wait.
    ///
    /// Same restart rules as [`start_outbound`](Self::start_outbound).
    ///
    /// # Errors
    /// `AlreadyRunning` if the inbound loop is running, `Stopping` if it
    /// was asked to stop but has not exited yet.
    ///
    /// # Panics
    /// If called outside a Tokio runtime.
    pub fn start_inbound(&self, wait: Duration) -> Result<(), DispatchError> {
        let worker = InboundWorker::new(self.inbound.clone(), self.received.clone());
        start_loop(&self.inbound_loop, || DispatchLoop::new(worker, wait).spawn())
    }

    /// Starts both loops with the configured waits.
    ///
    /// # Errors
    /// `AlreadyRunning` or `Stopping` if either loop cannot be started. The
    /// outbound loop is started first and stays running if the inbound one
    /// fails to start.
    pub fn start(&self) -> Result<(), DispatchError> {
        self.start_outbound(self.config.outbound_wait)?;
        self.start_inbound(self.config.inbound_wait)?;
        info!(
            outbound_wait_ms = self.config.outbound_wait.as_millis() as u64,
            inbound_wait_ms = self.config.inbound_wait.as_millis() as u64,
            "command manager started"
        );
        Ok(())
    }

    /// Asks the outbound loop to stop. No-op if it is not running.
    pub fn request_stop_outbound(&self) {
        if let Some(handle) = lock(&self.outbound_loop).as_ref() {
            handle.request_stop();
        }
    }

    /// Asks the inbound loop to stop. No-op if it is not running.
    pub fn request_stop_inbound(&self) {
        if let Some(handle) = lock(&self.inbound_loop).as_ref() {
            handle.request_stop();
        }
    }

    /// Whether the outbound loop is started and not yet asked to stop.
    pub fn is_outbound_running(&self) -> bool {
        is_running(&self.outbound_loop)
    }

    /// Whether the inbound loop is started and not yet asked to stop.
    pub fn is_inbound_running(&self) -> bool {
        is_running(&self.inbound_loop)
    }

    /// Stops both loops and waits for them to exit.
    ///
    /// Items still queued stay queued; a later `start` picks them up.
    ///
    /// # Errors
    /// `LoopFailed` if a loop task panicked. The other loop is still
    /// stopped and joined before returning.
    pub async fn shutdown(&self) -> Result<ShutdownReport, DispatchError> {
        let outbound = lock(&self.outbound_loop).take();
        let inbound = lock(&self.inbound_loop).take();

        if let Some(handle) = &outbound {
            handle.request_stop();
        }
        if let Some(handle) = &inbound {
            handle.request_stop();
        }

        let outbound = join(outbound).await;
        let inbound = join(inbound).await;
        let report = ShutdownReport {
            outbound: outbound?,
            inbound: inbound?,
        };
        debug!(
            outbound_processed = report.outbound.processed,
            inbound_processed = report.inbound.processed,
            inbound_errors = report.inbound.errors,
            pending_outbound = self.outbound.len(),
            pending_inbound = self.inbound.len(),
            "command manager shut down"
        );
        Ok(report)
    }

    pub(crate) fn inbound_queue(&self) -> CommandQueue<String> {
        self.inbound.clone()
    }
}

fn lock(slot: &Mutex<Option<LoopHandle>>) -> MutexGuard<'_, Option<LoopHandle>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

fn start_loop(
    slot: &Mutex<Option<LoopHandle>>,
    spawn: impl FnOnce() -> LoopHandle,
) -> Result<(), DispatchError> {
    let mut slot = lock(slot);
    if let Some(handle) = slot.as_ref() {
        if handle.is_stop_requested() && !handle.is_finished() {
            return Err(DispatchError::Stopping(handle.name()));
        }
        if !handle.is_finished() {
            return Err(DispatchError::AlreadyRunning(handle.name()));
        }
    }
    // A stopped loop that was never joined is replaced; its counters are lost.
    *slot = Some(spawn());
    Ok(())
}

fn is_running(slot: &Mutex<Option<LoopHandle>>) -> bool {
    lock(slot)
        .as_ref()
        .is_some_and(|handle| !handle.is_stop_requested() && !handle.is_finished())
}

async fn join(handle: Option<LoopHandle>) -> Result<LoopStats, DispatchError> {
    match handle {
        Some(handle) => handle.join().await,
        None => Ok(LoopStats::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robolink_protocol::Direction;

    #[test]
    fn test_new_clamps_config() {
        let manager = RobotCommandManager::new(DispatchConfig::with_wait(Duration::from_secs(30)));
        assert_eq!(manager.config(), DispatchConfig::with_wait(DispatchConfig::MAX_WAIT));
    }

    #[test]
    fn test_enqueue_without_start_only_queues() {
        let manager = RobotCommandManager::default();
        manager.enqueue_outbound(Message::movement(Direction::Down, false));
        manager.enqueue_inbound("D");
        assert_eq!(manager.outbound_len(), 1);
        assert_eq!(manager.inbound_len(), 1);
        assert!(!manager.is_outbound_running());
        assert!(!manager.is_inbound_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_is_rejected() {
        let manager = RobotCommandManager::default();
        manager.start().unwrap();

        let err = manager.start_inbound(Duration::ZERO).unwrap_err();
        assert!(matches!(err, DispatchError::AlreadyRunning("inbound")));
        assert!(manager.is_outbound_running());

        manager.shutdown().await.unwrap();
        assert!(!manager.is_outbound_running());
        assert!(!manager.is_inbound_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_stop_marks_loop_not_running() {
        let manager = RobotCommandManager::default();
        manager.start_outbound(Duration::from_millis(10)).unwrap();
        manager.request_stop_outbound();
        assert!(!manager.is_outbound_running());
        // Stopping a loop that never started is a no-op.
        manager.request_stop_inbound();

        let err = manager.start_outbound(Duration::from_millis(10)).unwrap_err();
        assert!(matches!(err, DispatchError::Stopping("outbound")));

        let report = manager.shutdown().await.unwrap();
        assert_eq!(report.inbound, LoopStats::default());
        manager.start_outbound(Duration::from_millis(10)).unwrap();
        assert!(manager.is_outbound_running());
        manager.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_without_start_reports_zeros() {
        let manager = RobotCommandManager::default();
        let report = manager.shutdown().await.unwrap();
        assert_eq!(report, ShutdownReport::default());
    }
}
