//! Wire protocol for talking to the robot.
//!
//! This crate defines the "language" spoken over the serial link:
//!
//! - **Types** ([`Point`], [`Direction`], [`MessageKind`], [`Message`]):
//!   the values that travel on the wire.
//! - **Codec** ([`encode`], [`decode_as`], the [`Codec`] trait): how one
//!   message becomes ASCII and back.
//! - **Factory** ([`classify`]): how a raw token of unknown kind is
//!   recognised.
//! - **Errors** ([`ProtocolError`]): what can go wrong along the way.
//!
//! # Architecture
//!
//! The protocol layer sits between the link (raw bytes) and the
//! dispatch loops (queues and observers). It does no I/O and keeps no
//! state between calls.
//!
//! ```text
//! Link (bytes) → Protocol (Message) → Dispatch (queues, observers)
//! ```

mod codec;
mod error;
mod factory;
mod grammar;
mod point;
mod types;

pub use codec::{decode_as, encode, Codec, Decoded, WireCodec};
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use factory::{classify, classify_all, classify_prefix, TRIAL_ORDER};
pub use grammar::{LOCATION_TERMINATOR, SEPARATOR};
pub use point::{Direction, Point};
pub use types::{
    BlockDetected, Digit, Location, Message, MessageKind, Movement, MovementType, Warning,
};
