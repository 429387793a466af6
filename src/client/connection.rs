//! Per-connection outbound path
//!
//! Every connection owns a bounded queue of outgoing lines drained by a
//! dedicated writer task. The registry only ever enqueues, so a slow or dead
//! peer never stalls the registry lock on network I/O.

use log::{debug, warn};
use std::net::SocketAddr;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

/// Sending side of a connection, stored in its registry slot.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    peer: SocketAddr,
    outbound: mpsc::Sender<String>,
}

impl ConnectionHandle {
    pub fn new(peer: SocketAddr, outbound: mpsc::Sender<String>) -> Self {
        Self { peer, outbound }
    }

    /// Returns the remote address of the connection.
    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Enqueues a message without waiting.
    ///
    /// Used for fan-out while the registry lock is held. Returns `false` when
    /// the message was dropped for this recipient.
    pub fn deliver(&self, message: &str) -> bool {
        match self.outbound.try_send(message.to_string()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                warn!("Outbound queue full for {}, dropping message", self.peer);
                false
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Outbound queue closed for {}", self.peer);
                false
            }
        }
    }

    /// Enqueues a direct reply, waiting for queue space.
    ///
    /// Must not be called with the registry lock held. Returns `false` once the
    /// writer has stopped.
    pub async fn send(&self, message: String) -> bool {
        self.outbound.send(message).await.is_ok()
    }
}

/// Creates a connection handle and the receiver its writer task drains.
pub fn outbound_channel(peer: SocketAddr, depth: usize) -> (ConnectionHandle, mpsc::Receiver<String>) {
    let (tx, rx) = mpsc::channel(depth);
    (ConnectionHandle::new(peer, tx), rx)
}

/// Spawns the task that writes queued lines to the peer.
///
/// The task ends when every handle for the connection has been dropped (after
/// flushing what is queued and shutting the write side down) or on the first
/// write error.
pub fn spawn_writer<W>(mut writer: W, mut outbound: mpsc::Receiver<String>, peer: SocketAddr) -> JoinHandle<()>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        while let Some(message) = outbound.recv().await {
            if let Err(e) = writer.write_all(message.as_bytes()).await {
                warn!("Failed to write to {}: {}", peer, e);
                return;
            }
        }
        let _ = writer.shutdown().await;
        debug!("Writer for {} finished", peer);
    })
}
