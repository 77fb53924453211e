//! # Robolink
//!
//! Command pipeline between an application and a line-following robot
//! that speaks a small ASCII protocol.
//!
//! Outbound [`Message`](robolink_protocol::Message)s are queued, encoded
//! at a fixed cadence and handed to the link; tokens coming back from the
//! robot are queued, classified at their own cadence and published as
//! typed messages or rejections.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use robolink::prelude::*;
//!
//! # async fn run() -> Result<(), RobolinkError> {
//! let manager = RobotCommandManager::new(DispatchConfig::default());
//! let (app_end, _robot_end) = LoopbackLink::pair();
//! let bridge = RobotLinkBridge::spawn(&manager, Arc::new(app_end));
//! let mut received = manager.subscribe_received();
//! manager.start()?;
//!
//! manager.enqueue_outbound(Message::location(Point::new(3, 7))?);
//! while let Some(event) = received.recv().await {
//!     println!("{event:?}");
//! }
//!
//! manager.shutdown().await?;
//! bridge.close().await?;
//! # Ok(())
//! # }
//! ```

mod bridge;
mod error;
mod manager;

pub use bridge::RobotLinkBridge;
pub use error::RobolinkError;
pub use manager::{RobotCommandManager, ShutdownReport};

pub use robolink_dispatch as dispatch;
pub use robolink_link as link;
pub use robolink_protocol as protocol;

/// Everything needed to drive a robot, in one import.
pub mod prelude {
    pub use crate::{RobolinkError, RobotCommandManager, RobotLinkBridge, ShutdownReport};

    pub use robolink_dispatch::{DispatchConfig, LoopStats, ReceivedEvent, SentEvent, Subscription};
    pub use robolink_link::{LineLink, Link, LinkError, LinkId, LoopbackLink};
    pub use robolink_protocol::{
        classify, encode, Direction, Message, MessageKind, Movement, MovementType, Point,
        ProtocolError,
    };
}
