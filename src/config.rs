//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/nacetree/nacetree.toml`
//! 3. Local config: `./.nacetree.toml`, or the file passed with `--config`
//! 4. Environment variables: `NACETREE_*` prefix, `__` between nested keys

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::RegexSectionParser;

/// EUR-Lex HTML rendition of Commission Delegated Regulation (EU) 2023/137 (NACE Rev. 2.1).
pub const DEFAULT_SOURCE_URL: &str =
    "https://eur-lex.europa.eu/legal-content/{lang}/TXT/HTML/?uri=CELEX:32023R0137";

/// Id of the annex element holding the table; the two letters are the language code.
pub const DEFAULT_CONTAINER_ID_PATTERN: &str = r"L_2023019[A-Z]{2}\.01000901";

/// Section keyword per language edition of the regulation.
const SECTION_KEYWORDS: &[(&str, &str)] = &[("EN", "SECTION"), ("DE", "ABSCHNITT")];

/// Section marker settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SectionConfig {
    /// Introductory keyword; when unset, derived from `language`
    pub keyword: Option<String>,
    /// Separator between the section letter and its title
    pub separator: String,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            keyword: None,
            separator: "—".into(),
        }
    }
}

/// Output file settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the exports
    pub dir: PathBuf,
    pub json_file: String,
    pub csv_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            json_file: "nace.json".into(),
            csv_file: "nace.csv".into(),
        }
    }
}

/// Line ending of CSV records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    #[default]
    Crlf,
    Lf,
}

/// CSV dialect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CsvConfig {
    pub delimiter: char,
    /// Escape character for quotes; when unset, quotes are doubled
    pub escape: Option<char>,
    pub line_terminator: LineTerminator,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            escape: None,
            line_terminator: LineTerminator::Crlf,
        }
    }
}

/// Unified configuration for nacetree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// ISO language code of the source document edition
    pub language: String,
    /// Source document URL; `{lang}` is replaced by `language`
    pub source_url: String,
    /// Regex matched against element ids to find the table container
    pub container_id_pattern: String,
    /// CSS selector for table rows inside the container
    pub row_selector: String,
    /// Rows skipped at the top of the table
    pub header_rows: usize,
    /// HTTP request timeout in seconds
    pub http_timeout_secs: u64,
    pub section: SectionConfig,
    pub output: OutputConfig,
    pub csv: CsvConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: "DE".into(),
            source_url: DEFAULT_SOURCE_URL.into(),
            container_id_pattern: DEFAULT_CONTAINER_ID_PATTERN.into(),
            row_selector: "tr.oj-table".into(),
            header_rows: 1,
            http_timeout_secs: 30,
            section: SectionConfig::default(),
            output: OutputConfig::default(),
            csv: CsvConfig::default(),
        }
    }
}

/// Get the XDG config directory for nacetree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "nacetree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("nacetree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".nacetree.toml")
}

/// Expand shell variables and tilde in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit local config file; defaults to `./.nacetree.toml` if present
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .add_source(Config::try_from(&defaults).map_err(config_err)?);

        // Global config (optional)
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(toml_file(&global_path).required(false));
            }
        }

        // Local config: an explicit path must exist, the implicit one may not
        match local {
            Some(path) => {
                builder = builder.add_source(toml_file(path).required(true));
            }
            None => {
                let path = local_config_path(Path::new("."));
                builder = builder.add_source(toml_file(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("NACETREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        settings.expand_paths();
        Ok(settings)
    }

    /// Expand `~` and `$VAR` in the output directory.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.output.dir.to_string_lossy().as_ref());
        self.output.dir = PathBuf::from(expanded);
    }

    /// Source URL for the configured language.
    pub fn source_url(&self) -> String {
        self.source_url.replace("{lang}", &self.language.to_uppercase())
    }

    /// Section keyword: explicit setting, else the language profile.
    pub fn section_keyword(&self) -> Result<String, ApplicationError> {
        if let Some(keyword) = &self.section.keyword {
            return Ok(keyword.clone());
        }
        let lang = self.language.to_uppercase();
        SECTION_KEYWORDS
            .iter()
            .find(|(code, _)| *code == lang)
            .map(|(_, keyword)| keyword.to_string())
            .ok_or_else(|| ApplicationError::Config {
                message: format!("no section keyword known for language {lang}; set section.keyword"),
            })
    }

    /// Section marker parser for the configured language.
    pub fn section_parser(&self) -> Result<RegexSectionParser, ApplicationError> {
        let keyword = self.section_keyword()?;
        RegexSectionParser::new(&keyword, &self.section.separator).map_err(|e| {
            ApplicationError::Config {
                message: format!("section pattern: {e}"),
            }
        })
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# nacetree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/nacetree/nacetree.toml
#   Local:  ./.nacetree.toml (or --config <file>)
#   Env:    NACETREE_* environment variables, e.g. NACETREE_CSV__DELIMITER=";"

# Language edition of the regulation (replaces {lang} in source_url)
# language = "DE"

# source_url = "https://eur-lex.europa.eu/legal-content/{lang}/TXT/HTML/?uri=CELEX:32023R0137"
# container_id_pattern = 'L_2023019[A-Z]{2}\.01000901'
# row_selector = "tr.oj-table"
# header_rows = 1
# http_timeout_secs = 30

[section]
# Keyword introducing a section row; derived from language (EN, DE) when unset
# keyword = "ABSCHNITT"
# separator = "—"

[output]
# dir = "."
# json_file = "nace.json"
# csv_file = "nace.csv"

[csv]
# delimiter = ","
# escape = "\\"
# line_terminator = "crlf"   # or "lf"
"#
        .to_string()
    }
}

/// Config files are TOML whatever their extension.
fn toml_file(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::new(&path.to_string_lossy(), FileFormat::Toml)
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
