//! TLS identity loading and the server-side handshake.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_rustls::TlsAcceptor;
use tokio_rustls::server::TlsStream;

use crate::error::{ConnectionError, IdentityError};

/// Certificate chain and private key presented to every client.
pub struct TlsIdentity {
    certs: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
}

impl TlsIdentity {
    /// Loads a PEM certificate chain and a PEM private key (PKCS#8, PKCS#1 or SEC1).
    pub fn load(cert_path: &Path, key_path: &Path) -> Result<Self, IdentityError> {
        let mut cert_reader = open(cert_path)?;
        let certs = rustls_pemfile::certs(&mut cert_reader)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| IdentityError::Io {
                path: cert_path.to_path_buf(),
                source,
            })?;
        if certs.is_empty() {
            return Err(IdentityError::NoCertificates(cert_path.to_path_buf()));
        }

        let mut key_reader = open(key_path)?;
        let key = rustls_pemfile::private_key(&mut key_reader)
            .map_err(|source| IdentityError::Io {
                path: key_path.to_path_buf(),
                source,
            })?
            .ok_or_else(|| IdentityError::NoPrivateKey(key_path.to_path_buf()))?;

        Ok(Self { certs, key })
    }

    pub fn certificates(&self) -> &[CertificateDer<'static>] {
        &self.certs
    }

    /// Builds the rustls server configuration. Client certificates are not requested.
    pub fn into_server_config(self) -> Result<Arc<rustls::ServerConfig>, IdentityError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = rustls::ServerConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()?
            .with_no_client_auth()
            .with_single_cert(self.certs, self.key)?;
        Ok(Arc::new(config))
    }
}

fn open(path: &Path) -> Result<BufReader<File>, IdentityError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| IdentityError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Upgrades accepted sockets to TLS sessions.
#[derive(Clone)]
pub struct Handshaker {
    acceptor: TlsAcceptor,
}

impl Handshaker {
    pub fn new(identity: TlsIdentity) -> Result<Self, IdentityError> {
        let config = identity.into_server_config()?;
        Ok(Self {
            acceptor: TlsAcceptor::from(config),
        })
    }

    /// Runs the server handshake once. On failure the raw stream is dropped.
    pub async fn handshake<IO>(&self, raw: IO) -> Result<TlsStream<IO>, ConnectionError>
    where
        IO: AsyncRead + AsyncWrite + Unpin,
    {
        self.acceptor
            .accept(raw)
            .await
            .map_err(ConnectionError::Handshake)
    }
}
