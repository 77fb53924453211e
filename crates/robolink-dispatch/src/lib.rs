//! Dispatch pipeline between application code and the robot link.
//!
//! Two independent polling loops move work through two FIFO queues:
//!
//! ```text
//! enqueue(Message) → [outbound queue] → outbound loop → encode  → "sent" observers
//! link tokens      → [inbound queue]  → inbound loop  → classify → "received" observers
//! ```
//!
//! Each loop is a [`DispatchLoop`] running on its own Tokio task. Every tick
//! it waits a fixed duration, then takes at most one item off its queue,
//! processes it and publishes the result. Stopping is cooperative: the
//! stop flag is checked once per tick, so the worst-case shutdown latency
//! is one wait.
//!
//! # Zero wait
//!
//! A wait of `Duration::ZERO` runs the loop as fast as possible. The loop
//! still yields to the runtime between ticks so it never monopolises a
//! worker thread.

mod config;
mod dispatcher;
mod error;
mod event;
mod observer;
mod queue;
mod worker;

pub use config::DispatchConfig;
pub use dispatcher::{DispatchLoop, LoopHandle, LoopStats, StopToken};
pub use error::DispatchError;
pub use event::{ReceivedEvent, SentEvent};
pub use observer::{Publisher, Subscription};
pub use queue::CommandQueue;
pub use worker::{InboundWorker, OutboundWorker, TickOutcome, Worker};
