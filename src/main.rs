use anyhow::Context;
use tokio::sync::watch;

use gemserve::bootstrap;
use gemserve::config::Config;
use gemserve::error::ServerError;
use gemserve::gemini::resolver::ContentRoot;
use gemserve::server::Server;
use gemserve::server::tls::TlsIdentity;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("gemserve v{}", env!("CARGO_PKG_VERSION"));

    let cfg = Config::load()?;

    if !cfg.content.root.is_dir() {
        return Err(ServerError::MissingRoot(cfg.content.root.clone()).into());
    }

    if cfg.bootstrap.enabled {
        bootstrap::ensure_index_logged(&ContentRoot::new(&cfg.content.root));
        bootstrap::ensure_identity(&cfg.cert_path(), &cfg.key_path(), &cfg.bootstrap.hostnames)
            .context("cannot provision a TLS identity")?;
    }

    let identity = TlsIdentity::load(&cfg.cert_path(), &cfg.key_path()).map_err(ServerError::from)?;
    let server = Server::bind(&cfg, identity)?;

    let addr = server.local_addr()?;
    tracing::info!(
        "Server started on port {}. Open gemini://localhost in a Gemini client to view the capsule.",
        addr.port()
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                tracing::error!("Error setting up Ctrl+C handler: {e}");
                // Keep the sender alive so the server keeps running without a handler.
                std::future::pending::<()>().await;
            }
        }
    });

    server.run(shutdown_rx).await?;
    tracing::info!("Server stopped");

    Ok(())
}
