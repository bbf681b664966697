//! Broadcast message handling for zero-cost cloning.
//!
//! When the same [`ServerMessage`] goes out to every player in a room
//! (`question`, `quiz_terminated`), cloning it once per recipient would
//! mean O(N * message_size) work. Wrapping it in an `Arc` first makes
//! the per-recipient cost O(pointer_size) instead.

use crate::protocol::ServerMessage;
use std::sync::Arc;

/// An `Arc`-wrapped server message, cheap to clone for fan-out sends.
pub type BroadcastMessage = Arc<ServerMessage>;

/// Wrap a message for broadcast.
#[inline]
pub fn broadcast(message: ServerMessage) -> BroadcastMessage {
    Arc::new(message)
}
