//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, DepthArg, FormatArg, SourceArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Forest, Level};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Build {
            source,
            format,
            output_dir,
        }) => _build(cli, source, *format, output_dir.as_deref()),
        Some(Commands::Tree { source, depth }) => _tree(cli, source, *depth),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => _config_show(cli),
            ConfigCommands::Init { global, force } => _config_init(*global, *force),
            ConfigCommands::Path => _config_path(cli),
        },
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Err(CliError::Usage(
            "no command given, see `nacetree --help`".to_string(),
        )),
    }
}

fn load_settings(cli: &Cli, source: &SourceArgs) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(lang) = &source.lang {
        if lang.len() != 2 || !lang.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CliError::InvalidArgs(format!(
                "--lang expects a two-letter language code, got {lang:?}"
            )));
        }
        settings.language = lang.to_uppercase();
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

#[instrument(skip(cli))]
fn _build(
    cli: &Cli,
    source: &SourceArgs,
    format: FormatArg,
    output_dir: Option<&Path>,
) -> CliResult<()> {
    let settings = load_settings(cli, source)?;
    let dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.output.dir.clone());

    let container = ServiceContainer::new(settings, source.input.as_deref())?;
    let report = container
        .conversion_service()
        .convert(container.location(), &format.formats(), &dir)?;

    output::success(&format!(
        "{} sections, {} codes",
        report.sections, report.nodes
    ));
    for path in &report.written {
        output::success_detail(&path.display());
    }
    Ok(())
}

#[instrument(skip(cli))]
fn _tree(cli: &Cli, source: &SourceArgs, depth: DepthArg) -> CliResult<()> {
    let settings = load_settings(cli, source)?;
    let container = ServiceContainer::new(settings, source.input.as_deref())?;
    let forest = container
        .conversion_service()
        .load_forest(container.location())?;

    println!("{}", forest.to_tree_string(Level::from(depth)));

    output::level_counts(&forest.level_counts());
    Ok(())
}

fn _config_show(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    output::info(&settings.to_toml()?);
    Ok(())
}

#[instrument]
fn _config_init(global: bool, force: bool) -> CliResult<()> {
    let path: PathBuf = if global {
        global_config_path().ok_or_else(|| {
            CliError::Usage("cannot determine global config directory".to_string())
        })?
    } else {
        let cwd = std::env::current_dir().map_err(|e| InfraError::io("current dir", e))?;
        local_config_path(&cwd)
    };

    let fs = RealFileSystem;
    if fs.exists(&path) && !force {
        return Err(CliError::Usage(format!(
            "{} already exists, use --force to overwrite",
            path.display()
        )));
    }
    fs.ensure_parent(&path)
        .map_err(|e| InfraError::io(format!("create parent of {}", path.display()), e))?;
    fs.write(&path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;

    output::action("Created", &path.display());
    Ok(())
}

fn _config_path(cli: &Cli) -> CliResult<()> {
    output::header("Config paths");
    match global_config_path() {
        Some(path) => output::detail(&format!("global: {}", path.display())),
        None => output::warning("global: no config directory on this platform"),
    }
    let local = match &cli.config {
        Some(path) => path.clone(),
        None => local_config_path(Path::new(".")),
    };
    let marker = if local.exists() { "" } else { " (missing)" };
    output::detail(&format!("local:  {}{}", local.display(), marker));
    Ok(())
}

fn _completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
