//! Conversion service
//!
//! Fetches the classification document, extracts its rows, rebuilds the hierarchy and
//! writes the requested exports.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::services::export::{CsvExporter, ExportFormat, Exporter, JsonExporter};
use crate::application::table::TableExtractor;
use crate::application::{ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{ClassificationCode, Forest, HierarchyBuilder, TableRow};
use crate::infrastructure::traits::{DocumentSource, FileSystem};

/// Summary of a finished conversion.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub sections: usize,
    pub nodes: usize,
    pub written: Vec<PathBuf>,
}

/// Service turning the published table into exported classification trees.
pub struct ConversionService {
    settings: Arc<Settings>,
    fs: Arc<dyn FileSystem>,
    source: Arc<dyn DocumentSource>,
}

impl ConversionService {
    /// Create a new conversion service.
    pub fn new(
        settings: Arc<Settings>,
        fs: Arc<dyn FileSystem>,
        source: Arc<dyn DocumentSource>,
    ) -> Self {
        Self {
            settings,
            fs,
            source,
        }
    }

    /// Fetch the document at `location` and extract its table rows.
    #[instrument(level = "debug", skip(self))]
    pub fn load_rows(&self, location: &str) -> ApplicationResult<Vec<TableRow>> {
        let html = self
            .source
            .fetch(location)
            .with_context(|| format!("fetch {location}"))?;
        debug!("load_rows: {} bytes", html.len());
        TableExtractor::from_settings(&self.settings)?.extract(&html)
    }

    /// Rebuild the section forest from ordered rows.
    pub fn build_forest(&self, rows: Vec<TableRow>) -> ApplicationResult<Vec<ClassificationCode>> {
        let builder = HierarchyBuilder::new(self.settings.section_parser()?);
        Ok(builder.build(rows)?)
    }

    /// Fetch, extract and build in one step.
    #[instrument(level = "debug", skip(self))]
    pub fn load_forest(&self, location: &str) -> ApplicationResult<Vec<ClassificationCode>> {
        let rows = self.load_rows(location)?;
        let forest = self.build_forest(rows)?;
        info!(
            "built {} sections, {} nodes",
            forest.len(),
            forest.preorder().count()
        );
        Ok(forest)
    }

    /// Write the forest in each requested format into `dir`.
    ///
    /// Returns the written paths in the order of `formats`.
    pub fn export(
        &self,
        forest: &[ClassificationCode],
        formats: &[ExportFormat],
        dir: &Path,
    ) -> ApplicationResult<Vec<PathBuf>> {
        self.fs
            .create_dir_all(dir)
            .with_path_context("create output dir", dir)?;

        let mut written = Vec::with_capacity(formats.len());
        for &format in formats {
            let (exporter, file_name): (Box<dyn Exporter>, &str) = match format {
                ExportFormat::Json => (Box::new(JsonExporter), &self.settings.output.json_file),
                ExportFormat::Csv => (
                    Box::new(CsvExporter::new(&self.settings.csv)?),
                    &self.settings.output.csv_file,
                ),
            };
            let target = dir.join(file_name);
            let content = exporter.render(forest)?;
            self.fs
                .ensure_parent(&target)
                .with_path_context("create parent dir", &target)?;
            self.fs
                .write(&target, &content)
                .with_path_context(&format!("write {format}"), &target)?;
            info!("wrote {} ({})", target.display(), exporter.format());
            written.push(target);
        }
        Ok(written)
    }

    /// Full pipeline: load the forest from `location` and export it.
    #[instrument(level = "debug", skip(self))]
    pub fn convert(
        &self,
        location: &str,
        formats: &[ExportFormat],
        dir: &Path,
    ) -> ApplicationResult<ConversionReport> {
        let forest = self.load_forest(location)?;
        let written = self.export(&forest, formats, dir)?;
        Ok(ConversionReport {
            sections: forest.len(),
            nodes: forest.preorder().count(),
            written,
        })
    }
}
