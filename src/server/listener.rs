use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tracing::{info, Instrument};

use crate::config::{Config, Strategy};
use crate::http::connection::Connection;
use crate::server::dispatcher::Dispatcher;

/// Binds a listening socket with address reuse enabled.
pub fn bind(addr: SocketAddr, backlog: u32) -> io::Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };
    socket.set_reuseaddr(true)?;
    socket.bind(addr)?;
    socket.listen(backlog)
}

pub struct Server {
    listener: TcpListener,
    dispatcher: Arc<Dispatcher>,
    strategy: Strategy,
    read_buffer_size: usize,
}

impl Server {
    /// Validates the config, prepares the dispatcher and binds the socket.
    /// Nothing is bound if the config is unusable.
    pub fn bind(cfg: &Config) -> anyhow::Result<Self> {
        cfg.validate()?;
        let dispatcher = Dispatcher::from_config(cfg)?;
        let listener = bind(cfg.listen_addr()?, cfg.server.backlog)?;

        Ok(Self::from_parts(
            listener,
            Arc::new(dispatcher),
            cfg.server.strategy,
            cfg.server.read_buffer_size,
        ))
    }

    pub fn from_parts(
        listener: TcpListener,
        dispatcher: Arc<Dispatcher>,
        strategy: Strategy,
        read_buffer_size: usize,
    ) -> Self {
        Self {
            listener,
            dispatcher,
            strategy,
            read_buffer_size,
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts forever. Per-connection failures, including panics, are
    /// logged and never end the loop.
    pub async fn run(self) -> anyhow::Result<()> {
        info!(
            addr = %self.local_addr()?,
            root = %self.dispatcher.root().path().display(),
            strategy = ?self.strategy,
            delay_ms = self.dispatcher.delay().as_millis() as u64,
            "Listening"
        );

        loop {
            let (socket, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!(error = %e, "Accept failed");
                    continue;
                }
            };
            tracing::debug!(%peer, "Accepted connection");

            let task = tokio::spawn(
                handle_connection(socket, Arc::clone(&self.dispatcher), self.read_buffer_size)
                    .instrument(tracing::info_span!("conn", %peer)),
            );

            match self.strategy {
                Strategy::Sequential => {
                    if let Err(e) = task.await {
                        tracing::error!(%peer, error = %e, "Connection task aborted");
                    }
                }
                // Detached: the task runs to completion on its own.
                Strategy::Concurrent => {}
            }
        }
    }
}

async fn handle_connection(socket: TcpStream, dispatcher: Arc<Dispatcher>, read_buffer_size: usize) {
    let mut conn = Connection::new(socket, dispatcher, read_buffer_size);
    if let Err(e) = conn.run().await {
        tracing::error!(error = %e, "Connection error");
    }
}

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    Server::bind(cfg)?.run().await
}
