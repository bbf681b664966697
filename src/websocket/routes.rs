//! HTTP routes: the `/ws` upgrade and a `/health` liveness probe.

use super::handler::websocket_handler;
use crate::server::QuizRelayServer;
use axum::routing::get;
use std::sync::Arc;

/// Build the Axum router, with CORS configured from `cors_origins`
/// (`"*"` or a comma-separated origin list).
pub fn create_router(cors_origins: &str) -> axum::Router<Arc<QuizRelayServer>> {
    use tower_http::cors::{Any, CorsLayer};
    use tower_http::trace::TraceLayer;

    let cors = if cors_origins.trim() == "*" {
        CorsLayer::permissive()
    } else {
        let origins: Vec<_> = cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse::<axum::http::HeaderValue>().ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("no valid CORS origins configured, falling back to permissive CORS");
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    axum::Router::new()
        .route("/ws", get(websocket_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "ok"
}
