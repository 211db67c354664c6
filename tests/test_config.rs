use std::path::PathBuf;
use std::time::Duration;

use gemserve::config::Config;
use gemserve::error::ServerError;

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.server.host, "0.0.0.0");
    assert_eq!(cfg.server.port, 1965);
    assert_eq!(cfg.server.backlog, 5);
    assert_eq!(cfg.server.accept_timeout(), Duration::from_secs(1));
    assert_eq!(cfg.server.max_request_bytes, 1024);
    assert_eq!(cfg.content.root, PathBuf::from("."));
    assert!(cfg.bootstrap.enabled);
}

#[test]
fn test_config_default_listen_addr() {
    let cfg = Config::default();
    assert_eq!(cfg.server.listen_addr().unwrap().to_string(), "0.0.0.0:1965");
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml_str(
        r#"
server:
  host: 127.0.0.1
  port: 1966
  backlog: 16
content:
  root: /srv/capsule
tls:
  cert: /etc/gemserve/cert.pem
bootstrap:
  enabled: false
"#,
    )
    .unwrap();

    assert_eq!(cfg.server.listen_addr().unwrap().to_string(), "127.0.0.1:1966");
    assert_eq!(cfg.server.backlog, 16);
    assert_eq!(cfg.server.accept_timeout_ms, 1000);
    assert_eq!(cfg.cert_path(), PathBuf::from("/etc/gemserve/cert.pem"));
    assert_eq!(cfg.key_path(), PathBuf::from("/srv/capsule/key.pem"));
    assert!(!cfg.bootstrap.enabled);
}

#[test]
fn test_config_empty_yaml_is_default() {
    let cfg = Config::from_yaml_str("{}").unwrap();
    assert_eq!(cfg.server.port, 1965);
}

#[test]
fn test_config_rejects_zero_backlog() {
    let result = Config::from_yaml_str("server:\n  backlog: 0\n");
    assert!(matches!(result, Err(ServerError::Config(_))));
}

#[test]
fn test_config_rejects_bad_host() {
    let result = Config::from_yaml_str("server:\n  host: not an address\n");
    assert!(matches!(result, Err(ServerError::Config(_))));
}

#[test]
fn test_config_ipv6_host() {
    let cfg = Config::from_yaml_str("server:\n  host: \"::1\"\n").unwrap();
    assert_eq!(cfg.server.listen_addr().unwrap().to_string(), "[::1]:1965");
}

#[test]
fn test_config_apply_listen() {
    let mut cfg = Config::default();
    cfg.apply_listen("127.0.0.1:3000").unwrap();

    assert_eq!(cfg.server.host, "127.0.0.1");
    assert_eq!(cfg.server.port, 3000);
}

#[test]
fn test_config_apply_listen_invalid() {
    let mut cfg = Config::default();
    assert!(cfg.apply_listen("localhost").is_err());
}

#[test]
fn test_config_with_root() {
    let cfg = Config::with_root("/tmp/capsule");

    assert_eq!(cfg.cert_path(), PathBuf::from("/tmp/capsule/cert.pem"));
    assert_eq!(cfg.key_path(), PathBuf::from("/tmp/capsule/key.pem"));
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gemserve.yaml");
    std::fs::write(&path, "server:\n  port: 2000\n").unwrap();

    let cfg = Config::from_file(&path).unwrap();
    assert_eq!(cfg.server.port, 2000);
}

#[test]
fn test_config_missing_file() {
    let result = Config::from_file(std::path::Path::new("/nonexistent/gemserve.yaml"));
    assert!(matches!(result, Err(ServerError::Config(_))));
}

// Environment is process-wide, so every LISTEN case lives in this one test.
#[test]
fn test_config_listen_from_env() {
    unsafe {
        std::env::remove_var("GEMSERVE_CONFIG");
        std::env::set_var("LISTEN", "127.0.0.1:3000");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.host, "127.0.0.1");
    assert_eq!(cfg.server.port, 3000);

    unsafe {
        std::env::set_var("LISTEN", "not-an-address");
    }
    assert!(matches!(Config::load(), Err(ServerError::Config(_))));

    unsafe {
        std::env::remove_var("LISTEN");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.port, 1965);
}
