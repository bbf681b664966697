//! Recoverable protocol error kinds.
//!
//! These are never used to unwind a task. A handler that hits one of
//! these converts it straight into an outbound `Error` frame and the
//! connection stays open, except where the channel is closed for an
//! unrelated reason (rate-limit breach, heartbeat failure).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The recoverable error conditions a handler can surface to a client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorKind {
    /// join/reconnect referenced a room that does not exist in the registry.
    RoomNotFound,
    /// reconnect supplied a session id that does not match the room's host.
    InvalidSession,
    /// join attempted against a room already at its configured player cap.
    RoomFull,
    /// an action targeted a channel with no bound room or player.
    RoomNotActive,
    /// an action targeted a player session the room does not recognize.
    PlayerNotFound,
    /// `restore_room` invoked again before `RESTORE_MIN_INTERVAL` elapsed.
    RestoreRateLimited,
    /// the frame was not valid JSON, or lacked a `type` field.
    MalformedFrame,
    /// the channel exceeded `RATE_LIMIT_PER_SECOND`.
    RateLimited,
    /// a second `create_room` arrived on a channel already hosting a room.
    AlreadyHostingRoom,
}

impl ErrorKind {
    /// The exact user-facing string this error kind surfaces on the wire.
    pub fn message(self) -> &'static str {
        match self {
            Self::RoomNotFound => "Raum nicht gefunden.",
            Self::InvalidSession => "Ungültige Sitzung.",
            Self::RoomFull => "Raum ist voll.",
            Self::RoomNotActive => "Raum ist nicht aktiv.",
            Self::PlayerNotFound => "Spieler nicht gefunden.",
            Self::RestoreRateLimited => "Bitte warten Sie, bevor Sie es erneut versuchen.",
            Self::MalformedFrame => "Ungültige Nachricht.",
            Self::RateLimited => "Zu viele Nachrichten. Bitte langsamer senden.",
            Self::AlreadyHostingRoom => "Sie hosten bereits einen Raum.",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[ErrorKind] = &[
        ErrorKind::RoomNotFound,
        ErrorKind::InvalidSession,
        ErrorKind::RoomFull,
        ErrorKind::RoomNotActive,
        ErrorKind::PlayerNotFound,
        ErrorKind::RestoreRateLimited,
        ErrorKind::MalformedFrame,
        ErrorKind::RateLimited,
        ErrorKind::AlreadyHostingRoom,
    ];

    #[test]
    fn every_kind_has_a_nonempty_message() {
        for kind in ALL {
            assert!(!kind.message().is_empty());
        }
    }

    #[test]
    fn display_matches_message() {
        for kind in ALL {
            assert_eq!(kind.to_string(), kind.message());
        }
    }

    #[test]
    fn room_not_found_matches_spec_text() {
        assert_eq!(ErrorKind::RoomNotFound.message(), "Raum nicht gefunden.");
    }
}
