//! Room teardown: expiry sweeps, host-disconnect grace, and shutdown
//! fan-out, plus room expiry and host-disconnect-grace timers.
//!
//! Each scheduled timer holds a [`CancellationToken`] clone rather than
//! a `JoinHandle`; cancelling it is how a reconnect or an explicit
//! `terminate` calls off a sweep that hasn't fired yet. The sweep
//! itself still re-checks room state before tearing anything down,
//! since a reconnect can race the timer firing at the same instant.

use crate::broadcast::broadcast;
use crate::protocol::RoomCode;
use crate::room::RoomHandle;
use crate::server::QuizRelayServer;
use crate::websocket::connection::ConnectionState;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Tear down a room unconditionally: notify every channel, cancel its
/// timers, and remove it from the registry (guarding the exact
/// instance, so a room already replaced under the same code survives).
pub async fn terminate_room(server: &Arc<QuizRelayServer>, room_code: &RoomCode, handle: &Arc<RoomHandle>) {
    let message = broadcast(crate::protocol::ServerMessage::QuizTerminated);
    {
        let mut room = handle.lock().await;
        if let Some(host_tx) = &room.host_channel {
            let _ = host_tx.try_send(message.clone());
        }
        for player in room.players.values_mut() {
            if let Some(tx) = &player.channel {
                let _ = tx.try_send(message.clone());
            }
            player.detach();
        }
        room.expiry_timer.cancel();
        room.cancel_host_disconnect_timer();
        room.host_channel = None;
    }
    server.registry.remove_if_current(room_code, handle);
}

/// Spawn the room's expiry sweep: fires once `max_age` has elapsed
/// unless `token` is cancelled first (by a `terminate` beating it to
/// the punch).
pub fn spawn_room_expiry(
    server: Arc<QuizRelayServer>,
    room_code: RoomCode,
    token: CancellationToken,
    max_age: Duration,
) {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(max_age) => {
                if let Some(handle) = server.registry.get(&room_code) {
                    debug!(room = %room_code, "expiring idle room");
                    terminate_room(&server, &room_code, &handle).await;
                }
            }
            _ = token.cancelled() => {}
        }
    });
}

/// Spawn the host-disconnect grace timer: fires `grace` after the host
/// drops, unless a reconnect cancels `token` first. Re-checks that the
/// host is still absent before tearing the room down, since a
/// reconnect can land in the same instant the timer fires.
pub fn spawn_host_disconnect_timer(
    server: Arc<QuizRelayServer>,
    room_code: RoomCode,
    token: CancellationToken,
    grace: Duration,
) {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(grace) => {
                if let Some(handle) = server.registry.get(&room_code) {
                    let host_absent = handle.lock().await.host_channel.is_none();
                    if host_absent {
                        debug!(room = %room_code, "closing room after host disconnect grace expired");
                        terminate_room(&server, &room_code, &handle).await;
                    }
                }
            }
            _ = token.cancelled() => {}
        }
    });
}

/// Run on a connection's exit: clears its role from the room it was
/// bound to and notifies the host, or arms the host-disconnect grace
/// timer if the departing channel was itself the host.
pub async fn handle_disconnect(server: &Arc<QuizRelayServer>, state: &ConnectionState) {
    let (Some(room_code), Some(session_id)) = (state.room_code.clone(), state.session_id.clone())
    else {
        return;
    };
    let Some(handle) = server.registry.get(&room_code) else {
        return;
    };

    if state.is_host {
        let token = {
            let mut room = handle.lock().await;
            if room.host_session_id != session_id {
                return;
            }
            room.host_channel = None;
            room.arm_host_disconnect_timer()
        };
        spawn_host_disconnect_timer(
            server.clone(),
            room_code,
            token,
            Duration::from_secs(server.config.server.host_disconnect_grace_secs),
        );
        return;
    }

    let mut room = handle.lock().await;
    let Some(player) = room.players.get_mut(&session_id) else {
        return;
    };
    player.detach();
    let name = player.name.clone();
    let player_count = room.player_count();
    if let Some(host_tx) = room.host_channel.clone() {
        let _ = host_tx.try_send(broadcast(crate::protocol::ServerMessage::PlayerLeft {
            session_id: session_id.into(),
            name,
            player_count,
        }));
    }
}

/// Tear down every live room, notifying their channels. Run once, from
/// the shutdown signal handler.
pub async fn graceful_shutdown(server: &Arc<QuizRelayServer>) {
    let mut handles = Vec::new();
    server.registry.for_each(|handle| handles.push(handle));
    for handle in handles {
        let room_code = handle.code().clone();
        terminate_room(server, &room_code, &handle).await;
    }
}
