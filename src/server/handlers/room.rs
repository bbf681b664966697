//! `create_room`, `reconnect_host`, `restore_room`, `join`, `terminate`
//! room lifecycle verbs.

use crate::broadcast::broadcast;
use crate::protocol::sanitize::{sanitize_name, sanitize_room_code, sanitize_session_id};
use crate::protocol::types::ROOM_CODE_LENGTH;
use crate::protocol::{
    now_millis, ErrorKind, PlayerSnapshotWire, RestorePlayerSnapshot, RoomCode, ServerMessage,
    SessionId,
};
use crate::rate_limit::RestoreRateLimiter;
use crate::room::{Player, Room, RoomHandle};
use crate::server::lifecycle;
use crate::server::QuizRelayServer;
use crate::websocket::connection::ConnectionState;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

fn player_snapshot(room: &Room) -> Vec<PlayerSnapshotWire> {
    room.players
        .values()
        .map(|player| PlayerSnapshotWire {
            session_id: player.session_id.clone().into(),
            name: player.name.clone(),
            score: player.score,
            is_connected: player.is_connected,
        })
        .collect()
}

/// **Inputs**: none. **Precondition**: this channel has not already
/// created a room. **Result**: mint a room and a host session, start
/// its expiry timer, reply `room_created`.
pub async fn create_room(server: &Arc<QuizRelayServer>, state: &mut ConnectionState) {
    if state.room_code.is_some() {
        state.send_error(ErrorKind::AlreadyHostingRoom).await;
        return;
    }

    let session_id = SessionId::generate();
    let outbound = state.outbound();
    let make_room = {
        let session_id = session_id.clone();
        move |code: RoomCode| {
            RoomHandle::new(Room::new(
                code,
                session_id.clone(),
                outbound.clone(),
                now_millis(),
            ))
        }
    };

    let Some(handle) = server.registry.mint(make_room) else {
        warn!("room code space exhausted; dropping create_room");
        return;
    };

    let room_code = handle.code().clone();
    let expiry_token = handle.lock().await.expiry_timer.clone();
    lifecycle::spawn_room_expiry(
        server.clone(),
        room_code.clone(),
        expiry_token,
        Duration::from_secs(server.config.server.room_max_age_secs),
    );

    state.bind_host(room_code.clone(), session_id.clone());
    state
        .send(ServerMessage::RoomCreated {
            room_id: room_code,
            session_id: session_id.into(),
        })
        .await;
}

/// **Inputs**: `roomId`, `sessionId`. Re-attaches this channel as the
/// room's host, cancelling any pending host-disconnect grace timer.
pub async fn reconnect_host(
    server: &Arc<QuizRelayServer>,
    state: &mut ConnectionState,
    room_id: String,
    session_id_raw: String,
) {
    let Some(session_id) = sanitize_session_id(Some(&session_id_raw)) else {
        state.send_error(ErrorKind::InvalidSession).await;
        return;
    };
    let room_code = sanitize_room_code(&room_id, ROOM_CODE_LENGTH);

    let Some(handle) = server.registry.get(&room_code) else {
        state
            .send(ServerMessage::RoomNotFoundTryRestore {
                room_id: room_code,
                session_id: session_id.into(),
            })
            .await;
        return;
    };

    let mut room = handle.lock().await;
    if room.host_session_id != session_id {
        drop(room);
        state.send_error(ErrorKind::InvalidSession).await;
        return;
    }

    room.cancel_host_disconnect_timer();
    room.host_channel = Some(state.outbound());
    let players = player_snapshot(&room);
    drop(room);

    state.bind_host(room_code.clone(), session_id);
    state
        .send(ServerMessage::HostReconnected {
            room_id: room_code,
            players,
            is_restored: None,
        })
        .await;
}

/// **Inputs**: `roomId`, `sessionId`, `players[]` (a host-side
/// snapshot). Degenerates to [`reconnect_host`] if the room still
/// exists under its original host; otherwise rebuilds it from the
/// snapshot, truncated to the room's player cap.
pub async fn restore_room(
    server: &Arc<QuizRelayServer>,
    state: &mut ConnectionState,
    restore_limiter: &mut RestoreRateLimiter,
    room_id: String,
    session_id_raw: String,
    snapshot_players: Vec<RestorePlayerSnapshot>,
) {
    if !restore_limiter.try_attempt() {
        state.send_error(ErrorKind::RestoreRateLimited).await;
        return;
    }

    let Some(host_session_id) = sanitize_session_id(Some(&session_id_raw)) else {
        state.send_error(ErrorKind::InvalidSession).await;
        return;
    };
    let requested_code = sanitize_room_code(&room_id, ROOM_CODE_LENGTH);

    if let Some(handle) = server.registry.get(&requested_code) {
        let matches_host = handle.lock().await.host_session_id == host_session_id;
        if matches_host {
            return reconnect_host(server, state, requested_code, session_id_raw).await;
        }
        // Code is taken by a different room; mint a fresh one below.
    }

    let max_players = server.max_players_per_room();
    let restored_players: Vec<(SessionId, Player)> = snapshot_players
        .into_iter()
        .take(max_players)
        .filter_map(|entry| {
            let session_id = SessionId::parse(&entry.id).ok()?;
            let score = entry
                .score
                .as_f64()
                .filter(|s| crate::protocol::sanitize::is_valid_score(*s))
                .unwrap_or(0.0);
            let name = sanitize_name(&entry.name);
            Some((
                session_id.clone(),
                Player::from_snapshot(session_id, name, score),
            ))
        })
        .collect();

    let outbound = state.outbound();
    let make_room = {
        let host_session_id = host_session_id.clone();
        let restored_players = restored_players.clone();
        move |code: RoomCode| {
            let mut room = Room::new(
                code,
                host_session_id.clone(),
                outbound.clone(),
                now_millis(),
            );
            room.players = restored_players.clone().into_iter().collect();
            RoomHandle::new(room)
        }
    };

    let Some(handle) = server.registry.mint(make_room) else {
        warn!("room code space exhausted; dropping restore_room");
        return;
    };

    let room_code = handle.code().clone();
    let (expiry_token, players) = {
        let room = handle.lock().await;
        (room.expiry_timer.clone(), player_snapshot(&room))
    };
    lifecycle::spawn_room_expiry(
        server.clone(),
        room_code.clone(),
        expiry_token,
        Duration::from_secs(server.config.server.room_max_age_secs),
    );

    state.bind_host(room_code.clone(), host_session_id);
    state
        .send(ServerMessage::HostReconnected {
            room_id: room_code,
            players,
            is_restored: Some(true),
        })
        .await;
}

/// **Inputs**: `roomCode`, `playerName`, optional `sessionId`. Rebinds
/// a known player's channel on reconnect, or admits a new one if the
/// room has capacity.
pub async fn join(
    server: &Arc<QuizRelayServer>,
    state: &mut ConnectionState,
    room_code_raw: String,
    player_name_raw: String,
    session_id_raw: Option<String>,
) {
    let room_code = sanitize_room_code(&room_code_raw, ROOM_CODE_LENGTH);
    let Some(handle) = server.registry.get(&room_code) else {
        state.send_error(ErrorKind::RoomNotFound).await;
        return;
    };

    let requested_session_id = session_id_raw
        .as_deref()
        .and_then(|raw| sanitize_session_id(Some(raw)));

    let mut room = handle.lock().await;

    if let Some(session_id) = requested_session_id {
        let reattached = room.players.get_mut(&session_id).map(|player| {
            player.attach(state.outbound());
            (player.score, player.name.clone())
        });

        if let Some((score, name)) = reattached {
            let player_count = room.player_count();
            let host_channel = room.host_channel.clone();
            drop(room);

            state.bind_player(room_code, session_id.clone());
            state
                .send(ServerMessage::Joined {
                    session_id: session_id.clone().into(),
                    score,
                    player_name: name.clone(),
                    is_reconnect: true,
                })
                .await;
            if let Some(host_tx) = host_channel {
                let _ = host_tx.try_send(broadcast(ServerMessage::PlayerReconnected {
                    session_id: session_id.into(),
                    name,
                    score,
                    player_count,
                }));
            }
            return;
        }
    }

    if !room.has_capacity(server.max_players_per_room()) {
        drop(room);
        state.send_error(ErrorKind::RoomFull).await;
        return;
    }

    let session_id = SessionId::generate();
    let name = sanitize_name(&player_name_raw);
    room.players.insert(
        session_id.clone(),
        Player::new(session_id.clone(), name.clone(), state.outbound()),
    );
    let player_count = room.player_count();
    let host_channel = room.host_channel.clone();
    drop(room);

    state.bind_player(room_code, session_id.clone());
    state
        .send(ServerMessage::Joined {
            session_id: session_id.clone().into(),
            score: 0.0,
            player_name: name.clone(),
            is_reconnect: false,
        })
        .await;
    if let Some(host_tx) = host_channel {
        let _ = host_tx.try_send(broadcast(ServerMessage::PlayerJoined {
            session_id: session_id.into(),
            name,
            player_count,
        }));
    }
}

/// **Host-only.** Broadcasts `quiz_terminated`, cancels the room's
/// timers, and removes it from the registry.
pub async fn terminate(server: &Arc<QuizRelayServer>, state: &mut ConnectionState) {
    if !state.is_host {
        return;
    }
    let Some(room_code) = state.room_code.clone() else {
        return;
    };
    let Some(session_id) = state.session_id.clone() else {
        return;
    };
    let Some(handle) = server.registry.get(&room_code) else {
        return;
    };

    let is_current_host = handle.lock().await.host_session_id == session_id;
    if !is_current_host {
        return;
    }

    lifecycle::terminate_room(server, &room_code, &handle).await;
}
