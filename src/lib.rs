//! dirsort - sort the files of a directory into category subdirectories
//!
//! This library classifies files by extension, moves them into one
//! subdirectory per category with collision-safe renaming, and reports every
//! decision through an observer. The category table and exclusion rules can
//! be extended from a TOML configuration file.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod observer;

pub use config::{CompiledFilters, ConfigError, SorterConfig};
pub use file_category::{Category, CategoryTable, DEFAULT_CATEGORY};
pub use file_organizer::{FileOrganizer, OrganizeError, RunSummary, handle_duplicates};
pub use observer::{OrganizeObserver, TracingObserver};

pub use cli::{Cli, CliError, run_cli};
