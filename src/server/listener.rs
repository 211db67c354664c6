use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tracing::info;

use crate::error::ServerError;

/// Result of one accept poll.
#[derive(Debug)]
pub enum Accepted {
    Connection(TcpStream, SocketAddr),
    /// Nobody connected within the poll interval.
    Timeout,
}

/// TCP listener with a bounded backlog and a polling accept.
pub struct Listener {
    inner: TcpListener,
    accept_timeout: Duration,
}

impl Listener {
    pub fn bind(addr: SocketAddr, backlog: u32, accept_timeout: Duration) -> Result<Self, ServerError> {
        let bind_err = |source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        };

        let socket = if addr.is_ipv4() {
            TcpSocket::new_v4()
        } else {
            TcpSocket::new_v6()
        }
        .map_err(bind_err)?;

        socket.set_reuseaddr(true).map_err(bind_err)?;
        socket.bind(addr).map_err(bind_err)?;
        let inner = socket.listen(backlog).map_err(bind_err)?;

        info!(address = %addr, backlog, "Listening");

        Ok(Self {
            inner,
            accept_timeout,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Waits up to the poll interval for a client.
    pub async fn accept(&self) -> std::io::Result<Accepted> {
        match tokio::time::timeout(self.accept_timeout, self.inner.accept()).await {
            Ok(Ok((stream, peer))) => Ok(Accepted::Connection(stream, peer)),
            Ok(Err(e)) => Err(e),
            Err(_elapsed) => Ok(Accepted::Timeout),
        }
    }
}
