//! Command-line interface for dirsort.
//!
//! This module handles:
//! - Argument parsing
//! - Validating the source directory
//! - Loading configuration
//! - Running the organizer and reporting completion

use crate::config::{ConfigError, SorterConfig};
use crate::file_organizer::{FileOrganizer, OrganizeError, RunSummary};
use crate::observer::TracingObserver;
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Sort the files of a directory into category subdirectories.
#[derive(Debug, Clone, Parser)]
#[command(name = "dirsort", version, about, long_about = None)]
pub struct Cli {
    /// Source directory to organize
    pub source: PathBuf,

    /// TOML file with extra categories and exclusion rules
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Report what would be moved without changing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Also log skipped directories and excluded files
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Arguments for a plain run on `source`.
    pub fn for_source(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            config: None,
            dry_run: false,
            verbose: false,
            quiet: false,
        }
    }
}

/// Errors that abort a run before or while listing the source directory.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Organize(#[from] OrganizeError),
}

/// Runs one organization pass as described by `cli`.
///
/// The source is checked before anything else, so a missing directory
/// leaves the filesystem untouched. Per-file failures are logged and do
/// not make the run fail.
///
/// # Examples
///
/// ```no_run
/// use dirsort::cli::{Cli, run_cli};
///
/// match run_cli(&Cli::for_source("/path/to/directory")) {
///     Ok(summary) => println!("moved {} files", summary.moved()),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<RunSummary, CliError> {
    if !cli.source.is_dir() {
        return Err(OrganizeError::NotADirectory {
            path: cli.source.clone(),
        }
        .into());
    }

    let config = SorterConfig::load(cli.config.as_deref())?;
    let organizer = FileOrganizer::new(config.category_table()?)
        .with_filters(config.compile_filters()?)
        .dry_run(cli.dry_run);

    let summary = organizer.process(&cli.source, &mut TracingObserver)?;

    tracing::debug!(
        "{} moved, {} planned, {} skipped, {} excluded, {} failed",
        summary.moved(),
        if summary.dry_run { summary.operations.len() } else { 0 },
        summary.skipped,
        summary.excluded,
        summary.failed
    );

    if cli.dry_run {
        tracing::info!("Dry run complete. No files were modified.");
    } else {
        tracing::info!("File organization complete.");
    }

    Ok(summary)
}
