//! WebSocket transport: upgrade handling, the connection loop, and the
//! HTTP routes the relay exposes.
//!
//! - [`handler`]: WebSocket upgrade entry point
//! - [`connection`]: per-connection state and the frame read/write loop
//! - [`routes`]: the Axum router (`/ws`, `/health`)

pub mod connection;
mod handler;
mod routes;

pub use handler::websocket_handler;
pub use routes::create_router;
