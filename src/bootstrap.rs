//! First-run setup of a content root.
//!
//! Creates the documents directory with a starter page and a self-signed
//! certificate when they are missing. The server itself never calls into
//! this module; the binary runs it before binding.

use std::path::Path;

use anyhow::{Context, Result};
use rcgen::{CertifiedKey, generate_simple_self_signed};
use tracing::{error, info};

use crate::gemini::request::INDEX_DOCUMENT;
use crate::gemini::resolver::ContentRoot;

/// Starter page written to `docs/index.gmi`.
pub const STARTER_INDEX: &str = include_str!("../templates/index.gmi");

/// Creates `docs/` and `docs/index.gmi` if they do not exist.
///
/// Existing files are left alone. Returns `true` when the index was written.
pub fn ensure_index(root: &ContentRoot) -> Result<bool> {
    let docs = root.docs_dir();
    if !docs.exists() {
        info!(path = %docs.display(), "Creating documents folder");
        std::fs::create_dir_all(&docs)
            .with_context(|| format!("failed to create {}", docs.display()))?;
    }

    let index = root.document_path(INDEX_DOCUMENT);
    if index.is_file() {
        return Ok(false);
    }

    info!(path = %index.display(), "Creating starter index");
    std::fs::write(&index, STARTER_INDEX)
        .with_context(|| format!("failed to write {}", index.display()))?;
    Ok(true)
}

/// Runs [`ensure_index`], logging instead of failing. A missing starter page
/// does not stop the server.
pub fn ensure_index_logged(root: &ContentRoot) {
    if let Err(e) = ensure_index(root) {
        error!(error = %format!("{e:#}"), "Failed to create starter index");
    }
}

/// Generates a self-signed certificate unless both PEM files already exist.
///
/// Returns `true` when new files were written.
pub fn ensure_identity(cert_path: &Path, key_path: &Path, hostnames: &[String]) -> Result<bool> {
    if cert_path.is_file() && key_path.is_file() {
        info!("Certificate and private key exist");
        return Ok(false);
    }

    info!(hostnames = ?hostnames, "Creating self-signed certificate and private key");

    let CertifiedKey { cert, signing_key } = generate_simple_self_signed(hostnames.to_vec())
        .context("failed to generate self-signed certificate")?;

    std::fs::write(cert_path, cert.pem())
        .with_context(|| format!("failed to write {}", cert_path.display()))?;
    std::fs::write(key_path, signing_key.serialize_pem())
        .with_context(|| format!("failed to write {}", key_path.display()))?;

    info!(cert = %cert_path.display(), key = %key_path.display(), "Created certificate and private key");
    Ok(true)
}
