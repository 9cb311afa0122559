use std::net::SocketAddr;
use std::sync::Arc;

use log::{info, warn};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::matchmaker::{ConnectionId, Matchmaker, Ticket};
use crate::session::Session;
use crate::transport::tcp::TcpTransport;
use crate::transport::Transport;

/// Accepts TCP connections, numbers them by arrival and hands each one to
/// its own session task.
pub struct Server {
    listener: TcpListener,
    matchmaker: Arc<Matchmaker>,
    config: ServerConfig,
    next_conn: u64,
}

impl Server {
    pub async fn bind(config: ServerConfig) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(&config.bind).await?;
        Ok(Self {
            listener,
            matchmaker: Arc::new(Matchmaker::new()),
            config,
            next_conn: 0,
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn matchmaker(&self) -> Arc<Matchmaker> {
        self.matchmaker.clone()
    }

    /// Accept forever. A failed accept is logged and skipped.
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("listening on {}", self.local_addr()?);
        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!("accept failed: {}", e);
                    continue;
                }
            };
            self.next_conn += 1;
            let conn = ConnectionId(self.next_conn);
            info!("connection {} from {}", conn, addr);

            // Seat before spawning so seats follow accept order.
            let ticket = self.matchmaker.admit(conn);
            let transport = TcpTransport::with_max_line_len(stream, self.config.max_line_len);
            tokio::spawn(serve_connection(conn, ticket, transport, self.matchmaker.clone()));
        }
    }
}

/// Run one admitted connection's session to completion, then release it.
pub async fn serve_connection<T: Transport>(
    conn: ConnectionId,
    ticket: Ticket,
    transport: T,
    matchmaker: Arc<Matchmaker>,
) {
    let game = ticket.game.clone();
    let session = Session::new(conn, ticket, transport);
    match session.run().await {
        Ok(phase) => info!("connection {} finished in {}", conn, phase),
        Err(e) => warn!("connection {} ended with an error: {}", conn, e),
    }
    matchmaker.release(conn);
    if game.outcome().is_some() {
        match serde_json::to_string(&game.summary()) {
            Ok(summary) => info!("match {} summary: {}", game.id(), summary),
            Err(e) => warn!("match {} summary unavailable: {}", game.id(), e),
        }
    }
}
