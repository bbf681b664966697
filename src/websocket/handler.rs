//! WebSocket upgrade handler: the connection entry point.

use super::connection::handle_socket;
use crate::server::QuizRelayServer;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::response::Response;
use std::net::SocketAddr;
use std::sync::Arc;

/// Accept a WebSocket upgrade and hand the socket to the connection loop.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(server): State<Arc<QuizRelayServer>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, server, addr))
}
