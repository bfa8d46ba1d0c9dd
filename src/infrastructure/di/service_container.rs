//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::application::services::ConversionService;
use crate::config::Settings;
use crate::infrastructure::traits::{
    DocumentSource, FileDocumentSource, FileSystem, HttpDocumentSource, RealFileSystem,
};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding the settings and the I/O boundaries services are built from.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Where the classification document comes from
    pub source: Arc<dyn DocumentSource>,

    location: String,
}

impl ServiceContainer {
    /// Create a container with real implementations.
    ///
    /// With `input` the document is read from that file, otherwise it is
    /// downloaded from the configured source URL.
    pub fn new(settings: Settings, input: Option<&Path>) -> InfraResult<Self> {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let (source, location): (Arc<dyn DocumentSource>, String) = match input {
            Some(path) => (
                Arc::new(FileDocumentSource::new(Arc::clone(&fs))),
                path.to_string_lossy().into_owned(),
            ),
            None => {
                let timeout = Duration::from_secs(settings.http_timeout_secs);
                let http = HttpDocumentSource::new(timeout).map_err(InfraError::HttpClient)?;
                (Arc::new(http), settings.source_url())
            }
        };
        debug!("document location: {}", location);
        Ok(Self::with_deps(settings, fs, source, location))
    }

    /// Create a container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        source: Arc<dyn DocumentSource>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
            source,
            location: location.into(),
        }
    }

    /// Location handed to the document source.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn conversion_service(&self) -> ConversionService {
        ConversionService::new(
            Arc::clone(&self.settings),
            Arc::clone(&self.fs),
            Arc::clone(&self.source),
        )
    }
}
