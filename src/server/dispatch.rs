//! Frame decoding and verb dispatch.
//!
//! `ClientMessage`'s tagged-enum decode hard-fails on an unrecognized
//! `type` (see `protocol::messages` tests), but unknown verbs must be
//! logged and silently dropped rather than surfaced as a malformed
//! frame. So the `type` field is probed first and only frames carrying
//! a recognized tag are handed to `serde_json::from_value`.

use crate::protocol::{ClientMessage, ErrorKind};
use crate::rate_limit::RestoreRateLimiter;
use crate::server::handlers;
use crate::server::QuizRelayServer;
use crate::websocket::connection::ConnectionState;
use std::sync::Arc;
use tracing::{debug, warn};

const KNOWN_TYPES: &[&str] = &[
    "create_room",
    "reconnect_host",
    "restore_room",
    "join",
    "submit_answer",
    "start_question",
    "send_results",
    "terminate",
];

/// Decode one inbound text frame and route it to the matching handler.
pub async fn dispatch(
    server: &Arc<QuizRelayServer>,
    state: &mut ConnectionState,
    restore_limiter: &mut RestoreRateLimiter,
    raw: &str,
) {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            debug!(%err, "rejecting malformed frame");
            state.send_error(ErrorKind::MalformedFrame).await;
            return;
        }
    };

    let Some(type_tag) = value.get("type").and_then(serde_json::Value::as_str) else {
        state.send_error(ErrorKind::MalformedFrame).await;
        return;
    };

    if !KNOWN_TYPES.contains(&type_tag) {
        warn!(r#type = type_tag, "dropping unrecognized message type");
        return;
    }

    let message: ClientMessage = match serde_json::from_value(value) {
        Ok(message) => message,
        Err(err) => {
            debug!(%err, r#type = type_tag, "rejecting frame with invalid fields");
            state.send_error(ErrorKind::MalformedFrame).await;
            return;
        }
    };

    match message {
        ClientMessage::CreateRoom => handlers::room::create_room(server, state).await,
        ClientMessage::ReconnectHost {
            room_id,
            session_id,
        } => handlers::room::reconnect_host(server, state, room_id, session_id).await,
        ClientMessage::RestoreRoom {
            room_id,
            session_id,
            players,
        } => {
            handlers::room::restore_room(
                server,
                state,
                restore_limiter,
                room_id,
                session_id,
                players,
            )
            .await
        }
        ClientMessage::Join {
            room_code,
            player_name,
            session_id,
        } => handlers::room::join(server, state, room_code, player_name, session_id).await,
        ClientMessage::SubmitAnswer { answer_data } => {
            handlers::question::submit_answer(server, state, answer_data).await
        }
        ClientMessage::StartQuestion {
            question,
            options,
            index,
            total,
            duration,
        } => {
            handlers::question::start_question(
                server, state, question, options, index, total, duration,
            )
            .await
        }
        ClientMessage::SendResults {
            correct,
            is_final,
            player_scores,
            leaderboard,
        } => {
            handlers::question::send_results(
                server,
                state,
                correct,
                is_final,
                player_scores,
                leaderboard,
            )
            .await
        }
        ClientMessage::Terminate => handlers::room::terminate(server, state).await,
    }
}
