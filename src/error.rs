//! Error types for the server.
//!
//! Errors are split by lifetime: a [`ServerError`] happens while starting up
//! and ends the process, a [`ConnectionError`] belongs to a single client and
//! is logged by the accept loop before it moves on.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal startup errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not bind or listen.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The certificate or private key could not be loaded.
    #[error("failed to load TLS identity: {0}")]
    Identity(#[from] IdentityError),

    /// The content root directory does not exist.
    #[error("content root {} does not exist", .0.display())]
    MissingRoot(PathBuf),

    /// The configuration is unreadable or inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Errors loading the certificate/key pair.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no certificates found in {}", .0.display())]
    NoCertificates(PathBuf),

    #[error("no private key found in {}", .0.display())]
    NoPrivateKey(PathBuf),

    #[error("certificate and key rejected: {0}")]
    Rejected(#[from] rustls::Error),
}

/// Recoverable errors raised while handling one connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The TLS upgrade failed; the raw socket has been dropped.
    #[error("TLS handshake failed: {0}")]
    Handshake(#[source] io::Error),

    /// Reading the request line failed at the socket level.
    #[error("failed to read request: {0}")]
    Read(#[source] io::Error),

    /// The request bytes are not valid UTF-8.
    #[error("malformed request: {0}")]
    Malformed(#[from] std::str::Utf8Error),

    /// An existing resource could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    ResourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The response could not be written.
    #[error("failed to write response: {0}")]
    Write(#[source] io::Error),
}

impl ConnectionError {
    /// Short label for the pipeline stage that failed, used as a log field.
    pub fn stage(&self) -> &'static str {
        match self {
            ConnectionError::Handshake(_) => "handshake",
            ConnectionError::Read(_) | ConnectionError::Malformed(_) => "read",
            ConnectionError::ResourceRead { .. } => "resolve",
            ConnectionError::Write(_) => "respond",
        }
    }
}
