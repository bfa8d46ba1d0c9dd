//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with in-memory implementations.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::debug;

use crate::infrastructure::error::HttpError;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => self.create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

/// Source of the published classification document.
pub trait DocumentSource: Send + Sync {
    /// Fetch the document at `location` as UTF-8 text.
    fn fetch(&self, location: &str) -> io::Result<String>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// Fetches the document over HTTP(S) with a blocking client.
#[derive(Debug, Clone)]
pub struct HttpDocumentSource {
    client: Client,
}

impl HttpDocumentSource {
    pub fn new(timeout: Duration) -> io::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(io::Error::other)?;
        Ok(Self { client })
    }
}

impl DocumentSource for HttpDocumentSource {
    /// Failures carry an [`HttpError`] inside the returned `io::Error`.
    fn fetch(&self, location: &str) -> io::Result<String> {
        debug!("fetch: GET {}", location);
        let transport = |source| {
            io::Error::other(HttpError::Transport {
                url: location.to_string(),
                source,
            })
        };
        let response = self
            .client
            .get(location)
            .header(USER_AGENT, concat!("nacetree/", env!("CARGO_PKG_VERSION")))
            .send()
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(io::Error::other(HttpError::Status {
                url: location.to_string(),
                status: status.as_u16(),
            }));
        }

        let bytes = response.bytes().map_err(transport)?;
        String::from_utf8(bytes.to_vec()).map_err(|source| {
            io::Error::other(HttpError::Decode {
                url: location.to_string(),
                source,
            })
        })
    }
}

/// Reads a previously saved copy of the document from disk.
pub struct FileDocumentSource {
    fs: Arc<dyn FileSystem>,
}

impl FileDocumentSource {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl DocumentSource for FileDocumentSource {
    fn fetch(&self, location: &str) -> io::Result<String> {
        debug!("fetch: read {}", location);
        self.fs.read_to_string(Path::new(location))
    }
}
