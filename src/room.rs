//! Room and player state.
//!
//! A [`Room`] holds everything a quiz session needs: the host's
//! channel, the player table, and the current question's timing.
//! Mutation is serialized by [`RoomHandle`]'s mutex — at most one
//! handler observes or changes a given room's state at a time.

use crate::broadcast::BroadcastMessage;
use crate::protocol::{Millis, RoomCode, SessionId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// Fallback display name for a player whose sanitized name is empty.
pub const FALLBACK_PLAYER_NAME: &str = "Spieler";

/// Outbound channel to a single connection. Bounded so a slow consumer
/// cannot back-pressure the rest of the server.
pub type OutboundTx = mpsc::Sender<BroadcastMessage>;

/// A single participant in a room.
#[derive(Debug, Clone)]
pub struct Player {
    pub session_id: SessionId,
    pub name: String,
    pub score: f64,
    pub channel: Option<OutboundTx>,
    pub is_connected: bool,
}

impl Player {
    pub fn new(session_id: SessionId, name: String, channel: OutboundTx) -> Self {
        Self {
            session_id,
            name,
            score: 0.0,
            channel: Some(channel),
            is_connected: true,
        }
    }

    /// Rebuild a player entry from a host-supplied restore snapshot. The
    /// player starts disconnected until it rejoins with its old id.
    pub fn from_snapshot(session_id: SessionId, name: String, score: f64) -> Self {
        Self {
            session_id,
            name,
            score,
            channel: None,
            is_connected: false,
        }
    }

    pub fn attach(&mut self, channel: OutboundTx) {
        self.channel = Some(channel);
        self.is_connected = true;
    }

    pub fn detach(&mut self) {
        self.channel = None;
        self.is_connected = false;
    }
}

/// Per-room data.
///
/// `host_session_id` is immutable for the room's lifetime (invariant 1).
/// `expiry_timer` and `host_disconnect_timer` are cancellation handles
/// for the lifecycle manager's scheduled tasks; cancelling
/// one does not require holding this struct's lock.
pub struct Room {
    pub code: RoomCode,
    pub host_session_id: SessionId,
    pub host_channel: Option<OutboundTx>,
    pub players: HashMap<SessionId, Player>,
    pub created_at: Millis,
    pub question_start_time: Option<Millis>,
    pub current_question_index: i64,
    pub expiry_timer: CancellationToken,
    pub host_disconnect_timer: Option<CancellationToken>,
}

impl Room {
    pub fn new(
        code: RoomCode,
        host_session_id: SessionId,
        host_channel: OutboundTx,
        created_at: Millis,
    ) -> Self {
        Self {
            code,
            host_session_id,
            host_channel: Some(host_channel),
            players: HashMap::new(),
            created_at,
            question_start_time: None,
            current_question_index: 0,
            expiry_timer: CancellationToken::new(),
            host_disconnect_timer: None,
        }
    }

    /// `players.size < max_players` (invariant 3, checked before insert).
    /// `max_players` is the server's configured cap, the single source of
    /// truth for room capacity.
    pub fn has_capacity(&self, max_players: usize) -> bool {
        self.players.len() < max_players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_host(&self, session_id: &SessionId) -> bool {
        *session_id == self.host_session_id
    }

    /// Cancel and clear the host-disconnect grace timer, if armed.
    /// Called on a successful `reconnect_host`.
    pub fn cancel_host_disconnect_timer(&mut self) {
        if let Some(timer) = self.host_disconnect_timer.take() {
            timer.cancel();
        }
    }

    /// Arm the host-disconnect grace timer (invariant 5: active iff the
    /// host channel is absent and the room is still alive).
    pub fn arm_host_disconnect_timer(&mut self) -> CancellationToken {
        self.cancel_host_disconnect_timer();
        let token = CancellationToken::new();
        self.host_disconnect_timer = Some(token.clone());
        token
    }

    pub fn connected_players(&self) -> impl Iterator<Item = &Player> {
        self.players.values().filter(|p| p.is_connected)
    }
}

/// The registry's unit of ownership: a room plus the mutex that
/// serializes every handler's access to it.
pub struct RoomHandle {
    code: RoomCode,
    inner: Mutex<Room>,
}

impl RoomHandle {
    pub fn new(room: Room) -> Arc<Self> {
        Arc::new(Self {
            code: room.code.clone(),
            inner: Mutex::new(room),
        })
    }

    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    pub async fn lock(&self) -> MutexGuard<'_, Room> {
        self.inner.lock().await
    }
}
