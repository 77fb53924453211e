//! Cadence configuration for the dispatch loops.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Inter-tick waits of the two dispatch loops.
///
/// A wait of zero means "run as fast as possible": the loop still yields
/// to the runtime between ticks but never sleeps.
///
/// Derives `Serialize`/`Deserialize` so a host application can embed it in
/// its own configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Wait between two outbound ticks. Bounds how fast commands reach
    /// the robot.
    pub outbound_wait: Duration,
    /// Wait between two inbound ticks.
    pub inbound_wait: Duration,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            outbound_wait: Duration::from_millis(50),
            inbound_wait: Duration::from_millis(20),
        }
    }
}

impl DispatchConfig {
    /// Longest accepted wait. Stop latency is bounded by one wait.
    pub const MAX_WAIT: Duration = Duration::from_secs(10);

    /// Same wait for both loops.
    pub fn with_wait(wait: Duration) -> Self {
        Self {
            outbound_wait: wait,
            inbound_wait: wait,
        }
    }

    /// Clamps out-of-range values so the config is safe to use.
    ///
    /// Called by the command manager before starting the loops.
    pub fn validated(mut self) -> Self {
        self.outbound_wait = clamp_wait("outbound_wait", self.outbound_wait);
        self.inbound_wait = clamp_wait("inbound_wait", self.inbound_wait);
        self
    }
}

fn clamp_wait(field: &'static str, wait: Duration) -> Duration {
    if wait > DispatchConfig::MAX_WAIT {
        warn!(
            field,
            wait_ms = wait.as_millis() as u64,
            max_ms = DispatchConfig::MAX_WAIT.as_millis() as u64,
            "dispatch wait exceeds maximum, clamping"
        );
        DispatchConfig::MAX_WAIT
    } else {
        wait
    }
}
