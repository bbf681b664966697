#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::too_many_arguments,
    clippy::similar_names
)]

//! # Quiz Relay Server
//!
//! A lightweight, in-memory relay server that mediates a quiz "host" and its
//! "player" participants over persistent WebSocket connections.
//!
//! Zero external persistence — no database, no cloud services. Rooms live in
//! memory for the lifetime of the process and are minted, routed, and expired
//! entirely in-process.

/// Optimized broadcast message handling
pub mod broadcast;

/// Server configuration and environment variables
pub mod config;

/// Structured logging configuration
pub mod logging;

/// Wire protocol, identifier minting, and input sanitization
pub mod protocol;

/// Per-connection rate limiting
pub mod rate_limit;

/// Room registry: the single process-wide owner of live rooms
pub mod registry;

/// Room and player state machine
pub mod room;

/// Main server orchestration: dispatch, handlers, lifecycle
pub mod server;

/// WebSocket connection handling
pub mod websocket;
