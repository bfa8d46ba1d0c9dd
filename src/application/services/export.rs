//! Export adapters: persist a classification forest as JSON or CSV.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::{CsvConfig, LineTerminator};
use crate::domain::{ClassificationCode, Forest, Level};

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Renders a forest into its serialized form.
pub trait Exporter {
    fn format(&self) -> ExportFormat;

    fn render(&self, forest: &[ClassificationCode]) -> ApplicationResult<String>;
}

/// Nested JSON document preserving the tree shape.
///
/// Four-space indentation; non-ASCII text is written verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonExporter;

impl JsonExporter {
    /// Parse a document previously written by [`JsonExporter::render`].
    pub fn read(json: &str) -> ApplicationResult<Vec<ClassificationCode>> {
        serde_json::from_str(json).map_err(|e| ApplicationError::OperationFailed {
            context: "parse json export".to_string(),
            source: Box::new(e),
        })
    }
}

impl Exporter for JsonExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn render(&self, forest: &[ClassificationCode]) -> ApplicationResult<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        forest.serialize(&mut ser).map_err(|e| ApplicationError::OperationFailed {
            context: "serialize json".to_string(),
            source: Box::new(e),
        })?;
        String::from_utf8(buf).map_err(|e| ApplicationError::OperationFailed {
            context: "json output is not utf-8".to_string(),
            source: Box::new(e),
        })
    }
}

/// One CSV line: the scalar fields of a node plus its section letter.
#[derive(Debug, Serialize)]
struct CsvRecord<'a> {
    level: Level,
    code: &'a str,
    normalized_code: &'a str,
    division_id: Option<u8>,
    group_id: Option<u8>,
    class_id: Option<u8>,
    section: &'a str,
    description: &'a str,
}

/// Flat table, one row per node in pre-order.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    delimiter: u8,
    escape: Option<u8>,
    terminator: csv::Terminator,
}

impl CsvExporter {
    pub fn new(config: &CsvConfig) -> ApplicationResult<Self> {
        let delimiter = ascii_byte("csv.delimiter", config.delimiter)?;
        let escape = config
            .escape
            .map(|c| ascii_byte("csv.escape", c))
            .transpose()?;
        let terminator = match config.line_terminator {
            LineTerminator::Crlf => csv::Terminator::CRLF,
            LineTerminator::Lf => csv::Terminator::Any(b'\n'),
        };
        Ok(Self {
            delimiter,
            escape,
            terminator,
        })
    }
}

impl Exporter for CsvExporter {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn render(&self, forest: &[ClassificationCode]) -> ApplicationResult<String> {
        let mut builder = csv::WriterBuilder::new();
        builder.delimiter(self.delimiter).terminator(self.terminator);
        if let Some(escape) = self.escape {
            builder.double_quote(false).escape(escape);
        }
        let mut writer = builder.from_writer(Vec::new());

        let flat = forest.flatten_nodes();
        debug!("render csv: {} records", flat.len());
        for entry in flat {
            let node = entry.node;
            writer
                .serialize(CsvRecord {
                    level: node.level,
                    code: &node.raw_code,
                    normalized_code: &node.normalized_code,
                    division_id: node.division_id,
                    group_id: node.group_id,
                    class_id: node.class_id,
                    section: entry.section,
                    description: &node.description,
                })
                .map_err(csv_err)?;
        }

        let bytes = writer.into_inner().map_err(|e| ApplicationError::OperationFailed {
            context: "flush csv".to_string(),
            source: Box::new(e.into_error()),
        })?;
        String::from_utf8(bytes).map_err(|e| ApplicationError::OperationFailed {
            context: "csv output is not utf-8".to_string(),
            source: Box::new(e),
        })
    }
}

fn ascii_byte(field: &str, c: char) -> ApplicationResult<u8> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| ApplicationError::Config {
            message: format!("{field} must be a single ASCII character, got {c:?}"),
        })
}

fn csv_err(e: csv::Error) -> ApplicationError {
    ApplicationError::OperationFailed {
        context: "write csv record".to_string(),
        source: Box::new(e),
    }
}
