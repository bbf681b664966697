//! `submit_answer`, `start_question`, `send_results`.
//!
//! The host supplies `question`/`options`/`index`/`total`/`duration` and
//! `correct`/`leaderboard` as loosely-typed JSON so a malformed field in
//! one of them never turns an entire frame into a hard decode error;
//! each handler validates what it needs and silently drops the message
//! on the host's side if validation fails (the host re-sends).

use crate::broadcast::broadcast;
use crate::protocol::sanitize::{is_valid_score, sanitize_name};
use crate::protocol::{now_millis, ErrorKind, LeaderboardEntryIn, LeaderboardEntryWire, ServerMessage};
use crate::server::QuizRelayServer;
use crate::websocket::connection::ConnectionState;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

const MAX_QUESTION_LEN: usize = 4000;
const MAX_OPTIONS: usize = 20;
const MAX_OPTION_LEN: usize = 500;
const MAX_QUESTION_DURATION_SECS: u32 = 80;
const DEFAULT_QUESTION_DURATION_SECS: u32 = 30;
const MAX_ANSWER_DATA_LEN: usize = 20;

fn sanitize_options(raw: &Value) -> Option<Vec<String>> {
    let items = raw.as_array()?;
    if items.len() > MAX_OPTIONS {
        return None;
    }
    items
        .iter()
        .map(|item| {
            let text = item.as_str()?;
            if text.chars().count() > MAX_OPTION_LEN {
                return None;
            }
            Some(text.to_string())
        })
        .collect::<Option<Vec<String>>>()
}

fn as_i64_array(raw: &Value, max_len: usize) -> Option<Vec<i64>> {
    let items = raw.as_array()?;
    if items.len() > max_len {
        return None;
    }
    items.iter().map(Value::as_i64).collect::<Option<Vec<i64>>>()
}

/// **Inputs**: `answerData`. Forwards a player's answer to the host,
/// tagged with the server-measured elapsed time since the question
/// started.
pub async fn submit_answer(server: &Arc<QuizRelayServer>, state: &mut ConnectionState, answer_data: Value) {
    let (Some(room_code), Some(session_id)) = (state.room_code.clone(), state.session_id.clone())
    else {
        state.send_error(ErrorKind::RoomNotActive).await;
        return;
    };
    let Some(answer_data) = as_i64_array(&answer_data, MAX_ANSWER_DATA_LEN) else {
        return;
    };

    let Some(handle) = server.registry.get(&room_code) else {
        state.send_error(ErrorKind::RoomNotActive).await;
        return;
    };
    let room = handle.lock().await;
    let Some(player) = room.players.get(&session_id) else {
        drop(room);
        state.send_error(ErrorKind::PlayerNotFound).await;
        return;
    };

    let now = now_millis();
    let elapsed_ms = room.question_start_time.map(|start| now - start);
    let message = ServerMessage::PlayerAnswered {
        session_id: session_id.into(),
        name: player.name.clone(),
        answer_data,
        answer_time: now,
        elapsed_ms,
    };
    if let Some(host_tx) = room.host_channel.clone() {
        let _ = host_tx.try_send(broadcast(message));
    }
}

/// **Host-only.** Broadcasts a new question to every connected player.
/// Silently dropped (not surfaced as an error) if any required field
/// fails validation, since a malformed host payload is a host-side bug
/// rather than something a player-facing error frame helps with.
#[allow(clippy::too_many_arguments)]
pub async fn start_question(
    server: &Arc<QuizRelayServer>,
    state: &mut ConnectionState,
    question: Value,
    options: Value,
    index: Value,
    total: Value,
    duration: Value,
) {
    if !state.is_host {
        return;
    }
    let Some(room_code) = state.room_code.clone() else {
        return;
    };

    let Some(question) = question.as_str().filter(|q| q.chars().count() <= MAX_QUESTION_LEN) else {
        return;
    };
    let Some(options) = sanitize_options(&options) else {
        return;
    };
    let Some(index) = index.as_i64().filter(|i| *i >= 0) else {
        return;
    };
    let Some(total) = total.as_i64().filter(|t| *t > 0) else {
        return;
    };
    let duration = duration
        .as_u64()
        .and_then(|d| u32::try_from(d).ok())
        .filter(|d| *d > 0 && *d <= MAX_QUESTION_DURATION_SECS)
        .unwrap_or(DEFAULT_QUESTION_DURATION_SECS);

    let Some(handle) = server.registry.get(&room_code) else {
        return;
    };
    let mut room = handle.lock().await;
    let start_time = now_millis();
    room.question_start_time = Some(start_time);
    room.current_question_index = index;

    let message = broadcast(ServerMessage::Question {
        question: question.to_string(),
        options,
        index,
        total,
        start_time,
        duration,
    });
    for player in room.connected_players() {
        if let Some(tx) = &player.channel {
            let _ = tx.try_send(message.clone());
        }
    }
}

/// **Host-only.** Applies the outcome of the current question to the
/// player table and sends each connected player its own personalized
/// result (the `playerScore` field differs per recipient, so this is
/// not a single shared broadcast).
pub async fn send_results(
    server: &Arc<QuizRelayServer>,
    state: &mut ConnectionState,
    correct: Value,
    is_final: bool,
    player_scores: HashMap<String, Value>,
    leaderboard: Option<Vec<LeaderboardEntryIn>>,
) {
    if !state.is_host {
        return;
    }
    let Some(room_code) = state.room_code.clone() else {
        return;
    };
    let Some(correct) = as_i64_array(&correct, MAX_OPTIONS) else {
        return;
    };

    let Some(handle) = server.registry.get(&room_code) else {
        return;
    };
    let mut room = handle.lock().await;
    let max_players = server.max_players_per_room();

    let leaderboard: Option<Vec<LeaderboardEntryWire>> = leaderboard.map(|entries| {
        entries
            .into_iter()
            .filter_map(|entry| {
                let name = entry.name.as_str()?;
                let score = entry.score.as_f64().filter(|s| is_valid_score(*s)).unwrap_or(0.0);
                Some(LeaderboardEntryWire {
                    name: sanitize_name(name),
                    score,
                })
            })
            .take(max_players)
            .collect()
    });

    for (session_id_raw, score_value) in &player_scores {
        let Ok(session_id) = crate::protocol::SessionId::parse(session_id_raw) else {
            continue;
        };
        let Some(score) = score_value.as_f64().filter(|s| is_valid_score(*s)) else {
            continue;
        };
        if let Some(player) = room.players.get_mut(&session_id) {
            player.score = score;
        }
    }

    let question_index = room.current_question_index;
    for player in room.connected_players() {
        let Some(tx) = &player.channel else { continue };
        let message = broadcast(ServerMessage::Result {
            correct: correct.clone(),
            is_final,
            question_index,
            leaderboard: leaderboard.clone(),
            player_score: player.score,
        });
        let _ = tx.try_send(message);
    }
}
