//! Tests for the extraction, conversion and export pipeline against a saved document

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use nacetree::application::services::{ExportFormat, JsonExporter};
use nacetree::application::{ApplicationError, TableExtractor};
use nacetree::config::{LineTerminator, Settings};
use nacetree::domain::{Forest, Level};
use nacetree::cli::CliError;
use nacetree::exitcode;
use nacetree::infrastructure::di::ServiceContainer;
use nacetree::infrastructure::traits::{DocumentSource, RealFileSystem};
use nacetree::infrastructure::{HttpError, InfraError};
use nacetree::util::testing;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/nace_de.html")
}

fn container(settings: Settings) -> ServiceContainer {
    testing::init_test_setup();
    ServiceContainer::new(settings, Some(&fixture())).unwrap()
}

#[test]
fn given_saved_document_when_extracting_then_returns_rows_after_header() {
    let html = std::fs::read_to_string(fixture()).unwrap();
    let extractor = TableExtractor::from_settings(&Settings::default()).unwrap();

    let rows = extractor.extract(&html).unwrap();

    assert_eq!(rows.len(), 14);
    assert!(rows[0].is_section_marker());
    assert_eq!(rows[1].code(), "01");
    assert_eq!(rows[3].code(), "01.11");
}

#[test]
fn given_saved_document_when_loading_forest_then_builds_two_sections() {
    let container = container(Settings::default());

    let forest = container
        .conversion_service()
        .load_forest(container.location())
        .unwrap();

    assert_eq!(forest.len(), 2);
    assert_eq!(forest[0].title(), "Land- Und Forstwirtschaft, Fischerei");
    assert_eq!(
        forest[1].title(),
        "Bergbau Und Gewinnung Von Steinen Und Erden"
    );
    let counts = forest.level_counts();
    assert_eq!(counts[&Level::Division], 3);
    assert_eq!(counts[&Level::Class], 5);
}

#[test]
fn given_english_keyword_for_german_document_when_loading_then_unrecognized_section() {
    let settings = Settings {
        language: "EN".into(),
        ..Settings::default()
    };
    let container = container(settings);

    let err = container
        .conversion_service()
        .load_forest(container.location())
        .unwrap_err();

    assert!(matches!(err, ApplicationError::Domain(_)));
}

#[test]
fn given_all_formats_when_converting_then_json_reads_back_and_csv_has_one_line_per_node() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.csv.line_terminator = LineTerminator::Lf;
    let container = container(settings);

    // Act
    let report = container
        .conversion_service()
        .convert(
            container.location(),
            &[ExportFormat::Json, ExportFormat::Csv],
            temp.path(),
        )
        .unwrap();

    // Assert
    assert_eq!(report.sections, 2);
    assert_eq!(report.nodes, 14);

    let json = std::fs::read_to_string(temp.path().join("nace.json")).unwrap();
    assert!(json.contains("Hülsenfrüchten"), "non-ASCII kept verbatim");
    let forest = JsonExporter::read(&json).unwrap();
    assert_eq!(forest.len(), 2);
    assert_eq!(forest.preorder().count(), 14);

    let csv = std::fs::read_to_string(temp.path().join("nace.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 15);
    assert!(lines.contains(&"class,02.10,0210,2,1,0,A,Forstwirtschaft"));
    assert!(lines.contains(&"division,05,05,5,,,B,Kohlenbergbau"));
}

#[test]
fn given_missing_input_file_when_loading_then_operation_failed() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.html");
    let container = ServiceContainer::new(Settings::default(), Some(&missing)).unwrap();

    let err = container
        .conversion_service()
        .load_rows(container.location())
        .unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}

struct ServerDown;

impl DocumentSource for ServerDown {
    fn fetch(&self, location: &str) -> io::Result<String> {
        Err(io::Error::other(HttpError::Status {
            url: location.to_string(),
            status: 503,
        }))
    }
}

#[test]
fn given_server_answering_503_when_loading_then_cli_exits_unavailable() {
    // Arrange
    testing::init_test_setup();
    let settings = Settings::default();
    let location = settings.source_url();
    let container = ServiceContainer::with_deps(
        settings,
        Arc::new(RealFileSystem),
        Arc::new(ServerDown),
        location,
    );

    // Act
    let err: CliError = container
        .conversion_service()
        .load_forest(container.location())
        .unwrap_err()
        .into();

    // Assert
    assert!(matches!(
        err,
        CliError::Infra(InfraError::Http(HttpError::Status { status: 503, .. }))
    ));
    assert_eq!(err.exit_code(), exitcode::UNAVAILABLE);
}

#[test]
fn given_missing_input_file_when_mapping_to_cli_then_exits_ioerr() {
    testing::init_test_setup();
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.html");
    let container = ServiceContainer::new(Settings::default(), Some(&missing)).unwrap();

    let err: CliError = container
        .conversion_service()
        .load_rows(container.location())
        .unwrap_err()
        .into();

    assert_eq!(err.exit_code(), exitcode::IOERR);
}
