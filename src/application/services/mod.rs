//! Application services

pub mod conversion;
pub mod export;

pub use conversion::{ConversionReport, ConversionService};
pub use export::{CsvExporter, ExportFormat, Exporter, JsonExporter};
