//! Error conversion helpers for common I/O operations
//!
//! Provides extension traits for cleaner error handling with path context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// fs.write(&target, &json)
    ///     .with_path_context("write json", &target)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;

    /// Add free-form context (e.g. a URL) to an I/O error.
    fn with_context(self, context: impl FnOnce() -> String) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.with_context(|| format!("{}: {}", action, path.display()))
    }

    fn with_context(self, context: impl FnOnce() -> String) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: context(),
            source: Box::new(e),
        })
    }
}
