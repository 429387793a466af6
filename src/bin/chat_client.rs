//! Chat Relay Client - Entry Point
//!
//! Sends each line typed on stdin to the server and prints everything the
//! server sends back. Stops after sending `LEAVE`, on end of input, or when
//! the server closes the connection.

use clap::Parser;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedReadHalf;

/// Time allowed for the server's last lines to arrive after LEAVE.
const LEAVE_GRACE: Duration = Duration::from_secs(2);

/// Chat relay client
#[derive(Parser, Debug)]
#[command(name = "chat-client", version, about = "Interactive chat relay client")]
struct Cli {
    /// Host the server runs on
    host: String,

    /// Port the server listens on
    port: u16,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(0);
        }
    };

    let stream = match TcpStream::connect((cli.host.as_str(), cli.port)).await {
        Ok(stream) => stream,
        Err(e) => {
            println!("Connection to <{}, {}> failed", cli.host, cli.port);
            debug!("Connect error: {}", e);
            return;
        }
    };
    info!("Connected to {}:{}", cli.host, cli.port);

    chat(stream).await;

    // A pending stdin read would otherwise keep the runtime from shutting down.
    std::process::exit(0);
}

async fn chat(stream: TcpStream) {
    let (read_half, mut write_half) = stream.into_split();
    let mut feedback = tokio::spawn(print_feedback(read_half));
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = input.next_line() => match line {
                Ok(Some(line)) => {
                    if let Err(e) = write_half.write_all(format!("{}\n", line).as_bytes()).await {
                        warn!("Failed to send to server: {}", e);
                        return;
                    }
                    if line.starts_with("LEAVE") {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    break;
                }
            },
            _ = &mut feedback => {
                info!("Server closed the connection");
                return;
            }
        }
    }

    let _ = write_half.shutdown().await;
    let _ = tokio::time::timeout(LEAVE_GRACE, feedback).await;
}

/// Copies everything the server sends to stdout until the connection closes.
async fn print_feedback(mut read_half: OwnedReadHalf) {
    let mut stdout = tokio::io::stdout();
    let mut buf = [0u8; 4096];

    loop {
        match read_half.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if stdout.write_all(&buf[..n]).await.is_err() || stdout.flush().await.is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!("Read from server failed: {}", e);
                break;
            }
        }
    }
}
