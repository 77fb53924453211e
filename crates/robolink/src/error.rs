//! Unified error type for robolink.

use robolink_dispatch::DispatchError;
use robolink_link::LinkError;
use robolink_protocol::ProtocolError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `robolink` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. `#[from]` lets
/// the `?` operator convert sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RobolinkError {
    /// Building, encoding, or classifying a message failed.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Starting or joining a dispatch loop failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The link to the robot failed.
    #[error(transparent)]
    Link(#[from] LinkError),
}
