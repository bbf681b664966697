//! Core identifiers and time representation for the wire protocol.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A four-character, uppercase alphanumeric room code (e.g. `"K4QX"`).
pub type RoomCode = String;

/// Length of a minted room code.
pub const ROOM_CODE_LENGTH: usize = 4;

/// Alphabet room codes are minted from.
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Prefix every session identifier carries, so malformed tokens can be
/// rejected on format alone before a registry lookup.
pub const SESSION_ID_PREFIX: &str = "sess-";

/// Opaque per-connection session token handed to a client on join or
/// room creation, and presented back on reconnect/restore.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Mint a fresh, random session id.
    pub fn generate() -> Self {
        Self(format!("{SESSION_ID_PREFIX}{}", Uuid::new_v4().simple()))
    }

    /// Parse a session id received over the wire, rejecting anything that
    /// does not carry the expected prefix and a plausible suffix.
    pub fn parse(raw: &str) -> Result<Self, SessionIdError> {
        let suffix = raw
            .strip_prefix(SESSION_ID_PREFIX)
            .ok_or(SessionIdError::MissingPrefix)?;
        if suffix.len() < 8 || !suffix.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(SessionIdError::MalformedSuffix);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SessionId> for String {
    fn from(value: SessionId) -> Self {
        value.0
    }
}

/// Why a session id failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionIdError {
    #[error("session id is missing the '{SESSION_ID_PREFIX}' prefix")]
    MissingPrefix,
    #[error("session id suffix is malformed")]
    MalformedSuffix,
}

/// Server-authoritative wall-clock milliseconds since the Unix epoch.
///
/// Client-supplied timestamps are never trusted; every timestamp that
/// reaches a client originates from a call to [`now_millis`].
pub type Millis = i64;

/// The current server time, in milliseconds since the Unix epoch.
pub fn now_millis() -> Millis {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_round_trips() {
        let id = SessionId::generate();
        let parsed = SessionId::parse(id.as_str()).expect("freshly minted id should parse");
        assert_eq!(id, parsed);
    }

    #[test]
    fn session_id_rejects_missing_prefix() {
        let err = SessionId::parse("not-a-session-id").unwrap_err();
        assert_eq!(err, SessionIdError::MissingPrefix);
    }

    #[test]
    fn session_id_rejects_foreign_characters() {
        let err = SessionId::parse("sess-not$$valid!!").unwrap_err();
        assert_eq!(err, SessionIdError::MalformedSuffix);
    }

    #[test]
    fn session_id_rejects_too_short_suffix() {
        let err = SessionId::parse("sess-ab12").unwrap_err();
        assert_eq!(err, SessionIdError::MalformedSuffix);
    }
}
