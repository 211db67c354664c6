use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::error::ConnectionError;
use crate::gemini::parser::read_request;
use crate::gemini::request::Request;
use crate::gemini::resolver::{ContentRoot, Resolution};
use crate::gemini::response::{Response, Status};
use crate::gemini::writer::ResponseWriter;

/// One client session after the TLS handshake.
///
/// Handles exactly one request. [`Connection::serve`] consumes the
/// connection and closes the stream whatever the outcome.
pub struct Connection<S> {
    stream: S,
    peer: SocketAddr,
    max_request_bytes: usize,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Resolving(Request),
    Responding(Request, ResponseWriter, Status),
    Closed(Outcome),
}

/// What was sent back to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub request: Request,
    pub status: Status,
    /// Bytes written, header included
    pub bytes: usize,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: SocketAddr, max_request_bytes: usize) -> Self {
        Self {
            stream,
            peer,
            max_request_bytes,
            state: ConnectionState::Reading,
        }
    }

    /// Handles the request and closes the connection.
    pub async fn serve(mut self, root: &ContentRoot) -> Result<Outcome, ConnectionError> {
        let result = self.run(root).await;
        self.close().await;
        result
    }

    async fn run(&mut self, root: &ContentRoot) -> Result<Outcome, ConnectionError> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Reading);

            self.state = match state {
                ConnectionState::Reading => {
                    let req = read_request(&mut self.stream, self.max_request_bytes).await?;
                    tracing::debug!(peer = %self.peer, request = %req.line, host = ?req.host(), "Request received");
                    ConnectionState::Resolving(req)
                }

                ConnectionState::Resolving(req) => {
                    let response = match root.resolve(&req.resource).await? {
                        Resolution::Found { path, body } => {
                            tracing::debug!(peer = %self.peer, path = %path.display(), size = body.len(), "Resource found");
                            Response::gemini(body)
                        }
                        Resolution::NotFound(path) => {
                            tracing::warn!(peer = %self.peer, path = %path.display(), "File not found");
                            Response::not_found()
                        }
                    };

                    let status = response.status();
                    let writer = ResponseWriter::new(&response);
                    ConnectionState::Responding(req, writer, status)
                }

                ConnectionState::Responding(request, mut writer, status) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    ConnectionState::Closed(Outcome {
                        request,
                        status,
                        bytes: writer.total_bytes(),
                    })
                }

                ConnectionState::Closed(outcome) => return Ok(outcome),
            };
        }
    }

    /// Shuts the stream down; for TLS streams this sends close_notify first.
    async fn close(mut self) {
        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(peer = %self.peer, error = %e, "Error while closing connection");
        }
    }
}
