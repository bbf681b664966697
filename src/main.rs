#![cfg_attr(not(test), deny(clippy::panic))]

use clap::Parser;
use quiz_relay_server::config;
use quiz_relay_server::logging;
use quiz_relay_server::server::{lifecycle, QuizRelayServer};
use quiz_relay_server::websocket;
use std::net::SocketAddr;

/// Quiz Relay -- lightweight WebSocket relay server for real-time host/player quiz sessions.
#[derive(Parser, Debug)]
#[command(name = "quiz-relay-server")]
#[command(about = "A lightweight, in-memory relay server for real-time host/player quiz sessions")]
#[command(version)]
struct Cli {
    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines and pre-deployment checks.
    #[arg(long, short = 'c', conflicts_with = "print_config")]
    validate_config: bool,

    /// Print the loaded configuration to stdout (as JSON) and exit.
    /// Useful for debugging configuration loading from multiple sources.
    #[arg(long, conflicts_with = "validate_config")]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from config.json if present; otherwise use code defaults.
    let cfg = config::load();

    if cli.print_config {
        let json = serde_json::to_string_pretty(&cfg)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    let validation_result = config::validate_config_security(&cfg);

    if cli.validate_config {
        match validation_result {
            Ok(()) => {
                println!("Configuration validation passed");
                println!();
                println!("Configuration summary:");
                println!("  Port: {}", cfg.port);
                println!("  Max players per room: {}", cfg.server.max_players_per_room);
                println!("  Room max age (secs): {}", cfg.server.room_max_age_secs);
                println!(
                    "  Host disconnect grace (secs): {}",
                    cfg.server.host_disconnect_grace_secs
                );
                println!("  CORS origins: {}", cfg.security.cors_origins);
                return Ok(());
            }
            Err(e) => {
                eprintln!("Configuration validation failed:\n{e}");
                std::process::exit(1);
            }
        }
    }

    validation_result?;

    logging::init_with_config(&cfg.logging);

    let port = cfg.port;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let cors_origins = cfg.security.cors_origins.clone();

    let server = QuizRelayServer::new(cfg);

    let router = websocket::create_router(&cors_origins).with_state(server.clone());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Starting quiz relay server");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(server))
    .await?;

    Ok(())
}

/// Wait for SIGINT or SIGTERM, then tear down every live room before the
/// process exits.
async fn shutdown_signal(server: std::sync::Arc<QuizRelayServer>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, terminating live rooms");
    lifecycle::graceful_shutdown(&server).await;
}
