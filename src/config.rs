use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ServerError;

/// Environment variable naming a YAML configuration file.
pub const CONFIG_ENV: &str = "GEMSERVE_CONFIG";
/// Environment variable overriding `server.host` and `server.port` with `host:port`.
pub const LISTEN_ENV: &str = "LISTEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub content: ContentConfig,
    pub tls: TlsConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Pending-connection queue length passed to `listen(2)`.
    pub backlog: u32,
    /// How long a single accept waits before the loop re-checks for shutdown.
    pub accept_timeout_ms: u64,
    pub max_request_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 1965,
            backlog: 5,
            accept_timeout_ms: 1000,
            max_request_bytes: 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub root: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

/// Certificate and key locations. Relative paths are taken from the content root.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert: PathBuf::from("cert.pem"),
            key: PathBuf::from("key.pem"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub enabled: bool,
    /// Subject alternative names for a generated self-signed certificate.
    pub hostnames: Vec<String>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hostnames: vec!["localhost".to_string()],
        }
    }
}

impl Config {
    /// Builds the process configuration.
    ///
    /// Starts from the file named by `GEMSERVE_CONFIG` (or defaults), then the
    /// first command line argument replaces the content root and `LISTEN`
    /// replaces the listen address.
    pub fn load() -> Result<Self, ServerError> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };

        if let Some(root) = std::env::args_os().nth(1) {
            cfg.content.root = PathBuf::from(root);
        }

        if let Ok(listen) = std::env::var(LISTEN_ENV) {
            cfg.apply_listen(&listen)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self, ServerError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ServerError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ServerError> {
        let cfg: Config =
            serde_yaml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults with the given content root.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let mut cfg = Self::default();
        cfg.content.root = root.into();
        cfg
    }

    /// Replaces host and port from a `host:port` string.
    pub fn apply_listen(&mut self, listen: &str) -> Result<(), ServerError> {
        let addr: SocketAddr = listen
            .parse()
            .map_err(|e| ServerError::Config(format!("{LISTEN_ENV}={listen}: {e}")))?;
        self.server.host = addr.ip().to_string();
        self.server.port = addr.port();
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ServerError> {
        if self.server.backlog == 0 {
            return Err(ServerError::Config("server.backlog must be at least 1".into()));
        }
        if self.server.accept_timeout_ms == 0 {
            return Err(ServerError::Config(
                "server.accept_timeout_ms must be at least 1".into(),
            ));
        }
        if self.server.max_request_bytes == 0 {
            return Err(ServerError::Config(
                "server.max_request_bytes must be at least 1".into(),
            ));
        }
        self.server.listen_addr()?;
        Ok(())
    }

    pub fn cert_path(&self) -> PathBuf {
        self.content.root.join(&self.tls.cert)
    }

    pub fn key_path(&self) -> PathBuf {
        self.content.root.join(&self.tls.key)
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> Result<SocketAddr, ServerError> {
        let text = if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        };
        text.parse()
            .map_err(|e| ServerError::Config(format!("listen address {text}: {e}")))
    }

    pub fn accept_timeout(&self) -> Duration {
        Duration::from_millis(self.accept_timeout_ms)
    }
}
