#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use gemserve::bootstrap::ensure_identity;
use gemserve::config::Config;
use gemserve::server::Server;
use gemserve::server::tls::TlsIdentity;
use rustls::pki_types::{CertificateDer, ServerName};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_rustls::TlsConnector;

/// A running server over a temporary content root.
pub struct TestServer {
    pub dir: TempDir,
    pub addr: SocketAddr,
    pub cert: CertificateDer<'static>,
    pub shutdown: watch::Sender<bool>,
    pub handle: JoinHandle<Result<(), gemserve::error::ServerError>>,
}

/// Starts a server whose `docs/` holds the given files.
pub async fn start(files: &[(&str, &[u8])]) -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    std::fs::create_dir(&docs).unwrap();
    for (name, contents) in files {
        std::fs::write(docs.join(name), contents).unwrap();
    }

    let mut cfg = Config::with_root(dir.path());
    cfg.server.host = "127.0.0.1".to_string();
    cfg.server.port = 0;
    cfg.server.accept_timeout_ms = 50;

    write_identity(dir.path());
    let identity = TlsIdentity::load(&cfg.cert_path(), &cfg.key_path()).unwrap();
    let cert = identity.certificates()[0].clone();

    let server = Server::bind(&cfg, identity).unwrap();
    let addr = server.local_addr().unwrap();

    let (shutdown, rx) = watch::channel(false);
    let handle = tokio::spawn(server.run(rx));

    TestServer {
        dir,
        addr,
        cert,
        shutdown,
        handle,
    }
}

pub fn write_identity(root: &Path) {
    ensure_identity(
        &root.join("cert.pem"),
        &root.join("key.pem"),
        &["localhost".to_string()],
    )
    .unwrap();
}

impl TestServer {
    fn connector(&self) -> TlsConnector {
        let mut roots = rustls::RootCertStore::empty();
        roots.add(self.cert.clone()).unwrap();

        let config = rustls::ClientConfig::builder_with_provider(Arc::new(
            rustls::crypto::ring::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .unwrap()
        .with_root_certificates(roots)
        .with_no_client_auth();

        TlsConnector::from(Arc::new(config))
    }

    /// Sends raw request bytes over TLS and returns everything the server wrote.
    pub async fn fetch_raw(&self, request: &[u8]) -> Vec<u8> {
        let tcp = TcpStream::connect(self.addr).await.unwrap();
        let domain = ServerName::try_from("localhost").unwrap();
        let mut tls = self.connector().connect(domain, tcp).await.unwrap();

        tls.write_all(request).await.unwrap();
        tls.flush().await.unwrap();

        let mut response = Vec::new();
        tokio::time::timeout(Duration::from_secs(5), tls.read_to_end(&mut response))
            .await
            .expect("server did not close the connection")
            .unwrap();
        response
    }

    /// Sends `line` followed by CRLF.
    pub async fn fetch(&self, line: &str) -> Vec<u8> {
        self.fetch_raw(format!("{line}\r\n").as_bytes()).await
    }

    pub async fn stop(self) {
        self.shutdown.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not shut down")
            .unwrap()
            .unwrap();
    }
}
