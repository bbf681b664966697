//! Wire protocol: the tagged JSON frames exchanged with clients.
//!
//! Every inbound frame is decoded into [`ClientMessage`] and every
//! outbound frame is built as a [`ServerMessage`]; the `type` field is
//! the discriminant and there is no separate envelope.

use super::types::Millis;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Messages sent from client to server.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Create a fresh room; the sender becomes its host.
    CreateRoom,
    /// Re-attach as host to an existing room.
    #[serde(rename_all = "camelCase")]
    ReconnectHost { room_id: String, session_id: String },
    /// Rebuild a room from the host's own snapshot.
    #[serde(rename_all = "camelCase")]
    RestoreRoom {
        room_id: String,
        session_id: String,
        #[serde(default)]
        players: Vec<RestorePlayerSnapshot>,
    },
    /// Join (or rejoin) a room as a player.
    #[serde(rename_all = "camelCase")]
    Join {
        room_code: String,
        player_name: String,
        #[serde(default)]
        session_id: Option<String>,
    },
    /// A player's answer to the room's current question.
    #[serde(rename_all = "camelCase")]
    SubmitAnswer { answer_data: serde_json::Value },
    /// Host broadcasts a new question to every connected player.
    #[serde(rename_all = "camelCase")]
    StartQuestion {
        question: serde_json::Value,
        options: serde_json::Value,
        index: serde_json::Value,
        total: serde_json::Value,
        #[serde(default)]
        duration: serde_json::Value,
    },
    /// Host reports the outcome of the current question.
    #[serde(rename_all = "camelCase")]
    SendResults {
        correct: serde_json::Value,
        is_final: bool,
        player_scores: HashMap<String, serde_json::Value>,
        #[serde(default)]
        leaderboard: Option<Vec<LeaderboardEntryIn>>,
    },
    /// Host ends the quiz; the room is torn down.
    Terminate,
}

/// One entry of a host-supplied room snapshot, as sent in `restore_room`.
#[derive(Debug, Clone, Deserialize)]
pub struct RestorePlayerSnapshot {
    pub id: String,
    pub name: String,
    pub score: serde_json::Value,
}

/// One leaderboard row as the host sends it in, before sanitization.
/// `name`/`score` are left as raw JSON values so a malformed field in
/// one entry never fails the whole `send_results` frame; the handler
/// validates each entry individually, same as it does for
/// `player_scores`.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardEntryIn {
    pub name: serde_json::Value,
    pub score: serde_json::Value,
}

/// A single leaderboard row, sanitized before it goes back out on the wire.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntryWire {
    pub name: String,
    pub score: f64,
}

/// A player as reported back to a reconnecting/restoring host.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshotWire {
    pub session_id: String,
    pub name: String,
    pub score: f64,
    pub is_connected: bool,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Sent to the host once a new room has been minted.
    #[serde(rename_all = "camelCase")]
    RoomCreated { room_id: String, session_id: String },
    /// Sent to the host after a successful reconnect or restore.
    #[serde(rename_all = "camelCase")]
    HostReconnected {
        room_id: String,
        players: Vec<PlayerSnapshotWire>,
        #[serde(skip_serializing_if = "Option::is_none")]
        is_restored: Option<bool>,
    },
    /// Cue for the host to fall back to `restore_room`.
    #[serde(rename_all = "camelCase")]
    RoomNotFoundTryRestore { room_id: String, session_id: String },
    /// Sent to a player once join/rejoin succeeds.
    #[serde(rename_all = "camelCase")]
    Joined {
        session_id: String,
        score: f64,
        player_name: String,
        is_reconnect: bool,
    },
    /// Sent to the host when a new player joins.
    #[serde(rename_all = "camelCase")]
    PlayerJoined {
        session_id: String,
        name: String,
        player_count: usize,
    },
    /// Sent to the host when a known player rejoins.
    #[serde(rename_all = "camelCase")]
    PlayerReconnected {
        session_id: String,
        name: String,
        score: f64,
        player_count: usize,
    },
    /// Sent to the host when a connected player's channel closes.
    #[serde(rename_all = "camelCase")]
    PlayerLeft {
        session_id: String,
        name: String,
        player_count: usize,
    },
    /// Sent to the host carrying a player's answer to the active question.
    #[serde(rename_all = "camelCase")]
    PlayerAnswered {
        session_id: String,
        name: String,
        answer_data: Vec<i64>,
        answer_time: Millis,
        #[serde(skip_serializing_if = "Option::is_none")]
        elapsed_ms: Option<Millis>,
    },
    /// Broadcast to every connected player when the host starts a question.
    #[serde(rename_all = "camelCase")]
    Question {
        question: String,
        options: Vec<String>,
        index: i64,
        total: i64,
        start_time: Millis,
        duration: u32,
    },
    /// Sent to each player once the host reports an outcome.
    #[serde(rename_all = "camelCase")]
    Result {
        correct: Vec<i64>,
        is_final: bool,
        question_index: i64,
        #[serde(skip_serializing_if = "Option::is_none")]
        leaderboard: Option<Vec<LeaderboardEntryWire>>,
        player_score: f64,
    },
    /// Broadcast to every channel in a room when it is torn down.
    QuizTerminated,
    /// A recoverable protocol error, sent only to the offending channel.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_room_has_no_payload_fields() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"create_room"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::CreateRoom));
    }

    #[test]
    fn join_decodes_camel_case_fields() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"join","roomCode":"AB12","playerName":"Eve"}"#,
        )
        .unwrap();
        match msg {
            ClientMessage::Join {
                room_code,
                player_name,
                session_id,
            } => {
                assert_eq!(room_code, "AB12");
                assert_eq!(player_name, "Eve");
                assert!(session_id.is_none());
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn room_created_serializes_with_snake_case_tag_and_camel_case_fields() {
        let msg = ServerMessage::RoomCreated {
            room_id: "AB12".to_string(),
            session_id: "sess-abc".to_string(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "room_created");
        assert_eq!(value["roomId"], "AB12");
        assert_eq!(value["sessionId"], "sess-abc");
    }

    #[test]
    fn error_frame_carries_only_message() {
        let msg = ServerMessage::Error {
            message: "Raum nicht gefunden.".to_string(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["message"], "Raum nicht gefunden.");
        assert!(value.get("error_code").is_none());
    }

    #[test]
    fn unknown_type_fails_to_decode() {
        let result: Result<ClientMessage, _> = serde_json::from_str(r#"{"type":"bogus"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn send_results_decodes_despite_a_malformed_leaderboard_entry() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"send_results","correct":[0],"isFinal":false,"playerScores":{},
                "leaderboard":[{"name":"Eve","score":"not a number"},{"name":42,"score":10}]}"#,
        )
        .expect("a loosely-typed leaderboard row must not fail the whole frame");
        match msg {
            ClientMessage::SendResults { leaderboard, .. } => {
                let leaderboard = leaderboard.unwrap();
                assert_eq!(leaderboard.len(), 2);
                assert_eq!(leaderboard[0].name, "Eve");
                assert!(!leaderboard[0].score.is_number());
                assert!(leaderboard[1].name.is_number());
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
