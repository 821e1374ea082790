use tokio::net::TcpListener;
use tracing::{debug, info};

mod client;
mod config;
mod connect6;
mod error;
mod hub;
mod messages;
mod server;
#[cfg(test)]
mod test_utils;

use crate::config::Config;
use crate::server::GameServer;

/// Entry point: starts the websocket server hosting a single Connect6 game
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(
        "Server listening on port {} (websocket path {})",
        config.port, config.ws_path
    );

    let server = GameServer::new(config);
    tokio::select! {
        result = server.run(listener) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutdown requested"),
    }

    let status = server.status().await?;
    info!(
        "Shutting down with {} live sessions, seats {:?}, game finished: {}",
        status.sessions, status.seats, status.finished
    );
    debug!("Final game state: {}", status.state);
    Ok(())
}
