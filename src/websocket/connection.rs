//! Per-connection state and the frame read/write loop.
//!
//! One task owns the socket end to end: it drives the heartbeat, reads
//! inbound frames and hands them to the dispatcher, and writes whatever
//! the dispatcher (or another room's broadcaster) queues on this
//! connection's outbound channel. Keeping reads, writes, and pings on a
//! single task means there is never more than one writer for the
//! socket, so no `Mutex` is needed around it.

use crate::broadcast::{broadcast, BroadcastMessage};
use crate::protocol::{ErrorKind, RoomCode, ServerMessage, SessionId};
use crate::rate_limit::{MessageRateLimiter, RateLimitDecision, RestoreRateLimiter};
use crate::room::OutboundTx;
use crate::server::dispatch::dispatch;
use crate::server::heartbeat::Heartbeat;
use crate::server::lifecycle;
use crate::server::QuizRelayServer;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Outbound frames buffered per connection before a slow consumer is
/// dropped rather than unboundedly queued.
const OUTBOUND_QUEUE_CAPACITY: usize = 64;

/// Everything a connection task tracks about the role this channel has
/// taken on: unbound, bound as a room's host, or bound as one of its
/// players.
pub struct ConnectionState {
    outbound: OutboundTx,
    pub room_code: Option<RoomCode>,
    pub session_id: Option<SessionId>,
    pub is_host: bool,
}

impl ConnectionState {
    pub fn new(outbound: OutboundTx) -> Self {
        Self {
            outbound,
            room_code: None,
            session_id: None,
            is_host: false,
        }
    }

    pub fn outbound(&self) -> OutboundTx {
        self.outbound.clone()
    }

    pub fn bind_host(&mut self, room_code: RoomCode, session_id: SessionId) {
        self.room_code = Some(room_code);
        self.session_id = Some(session_id);
        self.is_host = true;
    }

    pub fn bind_player(&mut self, room_code: RoomCode, session_id: SessionId) {
        self.room_code = Some(room_code);
        self.session_id = Some(session_id);
        self.is_host = false;
    }

    pub async fn send(&self, message: ServerMessage) {
        let _ = self.outbound.send(broadcast(message)).await;
    }

    pub async fn send_error(&self, kind: ErrorKind) {
        self.send(ServerMessage::Error {
            message: kind.message().to_string(),
        })
        .await;
    }
}

/// Drive one accepted WebSocket connection until it closes, then run
/// disconnect cleanup.
pub async fn handle_socket(socket: WebSocket, server: Arc<QuizRelayServer>, addr: SocketAddr) {
    let (mut sink, mut stream) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<BroadcastMessage>(OUTBOUND_QUEUE_CAPACITY);

    let mut state = ConnectionState::new(outbound_tx);

    let rate_limit_config = &server.config.server.rate_limit;
    let mut rate_limiter = MessageRateLimiter::with_limits(
        rate_limit_config.messages_per_second,
        rate_limit_config.messages_per_second * 3,
    );
    let mut restore_limiter = RestoreRateLimiter::with_interval(Duration::from_secs(
        rate_limit_config.restore_min_interval_secs,
    ));
    let mut heartbeat = Heartbeat::new(Duration::from_secs(
        server.config.websocket.heartbeat_interval_secs,
    ));
    let max_frame_bytes = server.config.websocket.max_frame_bytes;

    loop {
        tokio::select! {
            alive = heartbeat.tick() => {
                if !alive {
                    debug!(%addr, "closing connection after a missed heartbeat");
                    break;
                }
                if sink.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }
            outgoing = outbound_rx.recv() => {
                let Some(message) = outgoing else { break };
                let Ok(text) = serde_json::to_string(message.as_ref()) else { continue };
                if sink.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            incoming = stream.next() => {
                let Some(incoming) = incoming else { break };
                match incoming {
                    Ok(Message::Text(text)) => {
                        if text.len() > max_frame_bytes {
                            warn!(%addr, size = text.len(), "dropping oversized frame");
                            continue;
                        }
                        match rate_limiter.record() {
                            RateLimitDecision::Close => {
                                debug!(%addr, "closing connection after sustained rate limit breach");
                                break;
                            }
                            RateLimitDecision::RejectWithError => {
                                state.send_error(ErrorKind::RateLimited).await;
                            }
                            RateLimitDecision::Allow => {
                                dispatch(&server, &mut state, &mut restore_limiter, &text).await;
                            }
                        }
                    }
                    Ok(Message::Pong(_)) => heartbeat.record_pong(),
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(err) => {
                        debug!(%addr, %err, "websocket read error");
                        break;
                    }
                }
            }
        }
    }

    lifecycle::handle_disconnect(&server, &state).await;
}
