//! Link abstraction between robolink and the robot.
//!
//! Provides the [`Link`] trait, which abstracts over whatever carries
//! tokens to and from the robot (a Bluetooth serial port in production),
//! and two implementations:
//!
//! - [`LoopbackLink`]: an in-memory pair of endpoints, for tests and
//!   for simulating a robot.
//! - [`LineLink`]: newline-delimited tokens over any Tokio byte stream,
//!   e.g. a serial device opened as a file.
//!
//! A link moves whole tokens. Splitting a byte stream into tokens is the
//! link's business; the protocol layer only ever sees complete tokens.

mod error;
mod line;
mod loopback;

pub use error::LinkError;
pub use line::LineLink;
pub use loopback::LoopbackLink;

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for generating unique link IDs.
static NEXT_LINK_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_link_id() -> LinkId {
    LinkId::new(NEXT_LINK_ID.fetch_add(1, Ordering::Relaxed))
}

/// Opaque identifier for a link endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(u64);

impl LinkId {
    /// Creates a new `LinkId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "link-{}", self.0)
    }
}

/// A bidirectional channel carrying whole tokens to and from the robot.
///
/// The futures are `Send` so a link can be driven from spawned tasks.
/// Implementations may simply write `async fn` for each method.
pub trait Link: Send + Sync + 'static {
    /// Sends one token to the peer.
    fn send(&self, token: &[u8]) -> impl Future<Output = Result<(), LinkError>> + Send;

    /// Receives the next token from the peer.
    ///
    /// Returns `Ok(None)` when the link is cleanly closed.
    fn recv(&self) -> impl Future<Output = Result<Option<Vec<u8>>, LinkError>> + Send;

    /// Closes the link. Further sends fail; the peer's `recv` returns
    /// `Ok(None)` once pending tokens are drained.
    fn close(&self) -> impl Future<Output = Result<(), LinkError>> + Send;

    /// Returns the unique identifier for this endpoint.
    fn id(&self) -> LinkId;
}
