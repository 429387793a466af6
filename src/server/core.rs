use log::{error, info};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

use crate::client::{ClientRegistry, handle_client, outbound_channel};
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::middleware::logging::{log_connection, log_declined};

pub struct Server {
    client_registry: Arc<ClientRegistry>,
    listener: TcpListener,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Binds the listener and creates an empty registry of
    /// `config.max_clients` slots.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        let socket = config.listen_socket();

        let listener = TcpListener::bind(&socket)
            .await
            .map_err(|e| ServerError::Bind(socket.clone(), e))?;
        info!("Server bound to {}", socket);

        Ok(Self {
            client_registry: Arc::new(ClientRegistry::new(config.max_clients)),
            listener,
            config: Arc::new(config),
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Shared registry, for inspection.
    pub fn registry(&self) -> Arc<ClientRegistry> {
        Arc::clone(&self.client_registry)
    }

    pub async fn start(&self) {
        info!(
            "Starting chat relay on {} (max {} clients)",
            self.config.listen_socket(),
            self.client_registry.capacity()
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => self.admit(stream, addr).await,
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }

    /// Reserves a slot for a new connection and spawns its session, or closes
    /// the connection when the registry is full.
    async fn admit(&self, stream: TcpStream, addr: SocketAddr) {
        let (connection, outbound) = outbound_channel(addr, self.config.outbound_queue_depth);

        match self.client_registry.reserve(connection.clone()).await {
            Ok(slot) => {
                log_connection(&addr, slot);

                let client_registry = Arc::clone(&self.client_registry);
                let config = Arc::clone(&self.config);
                let (read_half, write_half) = stream.into_split();

                // Spawn a task for each client so accept loop doesn't block
                tokio::spawn(async move {
                    handle_client(
                        read_half,
                        write_half,
                        slot,
                        connection,
                        outbound,
                        client_registry,
                        config,
                    )
                    .await;
                });
            }
            Err(e) => {
                log_declined(&addr, &e);
                drop(stream);
            }
        }
    }
}
