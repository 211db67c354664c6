//! Maps resource names onto files under the content directory.

use std::path::PathBuf;

use bytes::Bytes;

use crate::error::ConnectionError;

/// Subdirectory of the content root holding servable documents.
pub const DOCS_DIR: &str = "docs";

/// Outcome of looking up a resource.
#[derive(Debug)]
pub enum Resolution {
    /// The file exists and was read in full.
    Found { path: PathBuf, body: Bytes },
    /// No regular file at this path.
    NotFound(PathBuf),
}

/// Base directory of the capsule. Documents live in its `docs` subdirectory.
#[derive(Debug, Clone)]
pub struct ContentRoot {
    root: PathBuf,
}

impl ContentRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn docs_dir(&self) -> PathBuf {
        self.root.join(DOCS_DIR)
    }

    /// `<root>/docs/<name>`
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.docs_dir().join(name)
    }

    /// Looks up `name` and reads the whole file into memory.
    ///
    /// Directories and missing paths are [`Resolution::NotFound`]. A read
    /// failure on an existing file is an error, not a not-found.
    pub async fn resolve(&self, name: &str) -> Result<Resolution, ConnectionError> {
        let path = self.document_path(name);

        let is_file = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.is_file(),
            Err(_) => false,
        };
        if !is_file {
            return Ok(Resolution::NotFound(path));
        }

        match tokio::fs::read(&path).await {
            Ok(contents) => Ok(Resolution::Found {
                path,
                body: Bytes::from(contents),
            }),
            Err(source) => Err(ConnectionError::ResourceRead { path, source }),
        }
    }
}
