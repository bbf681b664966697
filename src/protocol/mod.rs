//! Wire protocol: message types, identifier minting, and input
//! sanitization.

pub mod error_codes;
pub mod messages;
pub mod room_codes;
pub mod sanitize;
pub mod types;

pub use error_codes::ErrorKind;
pub use messages::{
    ClientMessage, LeaderboardEntryIn, LeaderboardEntryWire, PlayerSnapshotWire,
    RestorePlayerSnapshot, ServerMessage,
};
pub use types::{now_millis, Millis, RoomCode, SessionId, SessionIdError, ROOM_CODE_LENGTH};
