//! Accept loop.
//!
//! Connections are handled one at a time in arrival order: the next client
//! is accepted only after the previous one has been answered and closed.

pub mod listener;
pub mod tls;

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{ConnectionError, ServerError};
use crate::gemini::connection::{Connection, Outcome};
use crate::gemini::resolver::ContentRoot;
use listener::{Accepted, Listener};
use tls::{Handshaker, TlsIdentity};

/// Pause after a failed accept before polling again.
pub const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

pub struct Server {
    listener: Listener,
    handshaker: Handshaker,
    root: ContentRoot,
    max_request_bytes: usize,
}

impl Server {
    /// Binds the listener and prepares the TLS acceptor.
    pub fn bind(cfg: &Config, identity: TlsIdentity) -> Result<Self, ServerError> {
        let handshaker = Handshaker::new(identity)?;
        let listener = Listener::bind(
            cfg.server.listen_addr()?,
            cfg.server.backlog,
            cfg.server.accept_timeout(),
        )?;

        Ok(Self {
            listener,
            handshaker,
            root: ContentRoot::new(&cfg.content.root),
            max_request_bytes: cfg.server.max_request_bytes,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves clients until `shutdown` becomes `true` or its sender is dropped.
    ///
    /// Per-connection failures are logged and never end the loop.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<(), ServerError> {
        loop {
            if shutdown_requested(&mut shutdown) {
                info!("Shutdown signal received, closing listener");
                break;
            }

            let (stream, peer) = match self.listener.accept().await {
                Ok(Accepted::Connection(stream, peer)) => (stream, peer),
                Ok(Accepted::Timeout) => continue,
                Err(e) => {
                    pause_after_accept_error(&e).await;
                    continue;
                }
            };

            debug!(peer = %peer, "Accepted connection");

            match self.handle(stream, peer).await {
                Ok(outcome) => info!(
                    peer = %peer,
                    request = %outcome.request.line,
                    resource = %outcome.request.resource,
                    status = outcome.status.code(),
                    bytes = outcome.bytes,
                    "Request served"
                ),
                Err(e) => log_connection_error(peer, &e),
            }
        }

        Ok(())
    }

    async fn handle(
        &self,
        stream: tokio::net::TcpStream,
        peer: SocketAddr,
    ) -> Result<Outcome, ConnectionError> {
        let session = self.handshaker.handshake(stream).await?;
        Connection::new(session, peer, self.max_request_bytes)
            .serve(&self.root)
            .await
    }
}

fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) -> bool {
    match shutdown.has_changed() {
        Ok(_) => *shutdown.borrow_and_update(),
        // Sender gone: nobody can ask us to keep running.
        Err(_) => true,
    }
}

/// Logs a failed accept and waits before the next poll, so a persistent
/// error such as EMFILE does not turn the loop into a busy spin.
async fn pause_after_accept_error(e: &std::io::Error) {
    error!(error = %e, "Failed to accept connection");
    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
}

fn log_connection_error(peer: SocketAddr, e: &ConnectionError) {
    match e {
        ConnectionError::Handshake(_) => {
            error!(peer = %peer, error = %e, "Failed to establish TLS session");
            info!(
                "This usually means the client does not trust the self-signed certificate. \
                 Add an exception for this host in the client (Ctrl+Shift+U in Lagrange)."
            );
        }
        ConnectionError::ResourceRead { .. } => {
            error!(peer = %peer, stage = e.stage(), error = %e, "Dropped connection");
        }
        _ => {
            warn!(peer = %peer, stage = e.stage(), error = %e, "Dropped connection");
        }
    }
}
