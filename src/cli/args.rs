//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::services::ExportFormat;
use crate::domain::Level;

/// Turn the NACE Rev. 2.1 classification table into a Section/Division/Group/Class tree
#[derive(Parser, Debug)]
#[command(name = "nacetree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file used instead of ./.nacetree.toml
    #[arg(short, long, global = true, env = "NACETREE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download the table, build the tree and export it
    Build {
        #[command(flatten)]
        source: SourceArgs,

        /// Export format
        #[arg(short, long, value_enum, default_value_t = FormatArg::All)]
        format: FormatArg,

        /// Output directory (default: output.dir from config)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        output_dir: Option<PathBuf>,
    },

    /// Print the classification tree
    Tree {
        #[command(flatten)]
        source: SourceArgs,

        /// Deepest level shown
        #[arg(long, value_enum, default_value_t = DepthArg::Class)]
        depth: DepthArg,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Where the table comes from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Language edition of the regulation, e.g. DE or EN
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Read a saved HTML file instead of downloading
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub input: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show config paths
    Path,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Json,
    Csv,
    All,
}

impl FormatArg {
    pub fn formats(self) -> Vec<ExportFormat> {
        match self {
            FormatArg::Json => vec![ExportFormat::Json],
            FormatArg::Csv => vec![ExportFormat::Csv],
            FormatArg::All => vec![ExportFormat::Json, ExportFormat::Csv],
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthArg {
    Section,
    Division,
    Group,
    Class,
}

impl From<DepthArg> for Level {
    fn from(depth: DepthArg) -> Self {
        match depth {
            DepthArg::Section => Level::Section,
            DepthArg::Division => Level::Division,
            DepthArg::Group => Level::Group,
            DepthArg::Class => Level::Class,
        }
    }
}
