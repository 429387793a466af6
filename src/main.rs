//! Chat Relay Server - Entry Point
//!
//! A line-oriented chat relay: JOIN, WHO, LEAVE, and everything else is
//! broadcast to the clients that have joined.

use clap::Parser;
use log::info;

use chat_relay::Server;
use chat_relay::ServerConfig;
use chat_relay::error::ServerError;
use chat_relay::error::handlers::handle_error;

/// Chat relay server
#[derive(Parser, Debug)]
#[command(name = "chat-relay", version, about = "Line-oriented chat relay server")]
struct Cli {
    /// Port to listen on (overrides config.toml and CHAT_RELAY_PORT)
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(0);
        }
    };

    if let Err(e) = run(cli).await {
        handle_error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), ServerError> {
    let mut config = ServerConfig::load()?;
    if let Some(port) = cli.port {
        config = config.with_port(port);
        config.validate()?;
    }

    info!("Launching chat relay...");

    let server = Server::bind(config).await?;
    info!("Listening on {}", server.local_addr()?);
    server.start().await;
    Ok(())
}
