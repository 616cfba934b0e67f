//! Category table and exclusion configuration.
//!
//! Without a configuration file the built-in category table is used and no
//! file is excluded. A TOML file can extend or replace the table, rename the
//! catch-all category, and exclude entries from organization:
//!
//! ```toml
//! default_category = "Others"
//! replace_defaults = false
//!
//! [categories]
//! Images = [".webp"]
//! Ebooks = ["epub", ".mobi"]
//!
//! [filters]
//! exclude_filenames = [".DS_Store", "Thumbs.db"]
//! exclude_patterns = ["*.part"]
//! exclude_regex = ["^~\\$"]
//! ```
//!
//! A category named in the file replaces the built-in category of the same
//! name. The configuration is only ever read; nothing is written back.

use crate::file_category::{Category, CategoryTable, DEFAULT_CATEGORY, default_categories};
use glob::Pattern;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading or compiling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(#[from] toml::de::Error),
    #[error("Invalid category name '{0}': must be a single directory name")]
    InvalidCategoryName(String),
    #[error("Extension '{extension}' is listed under both '{first}' and '{second}'")]
    DuplicateExtension {
        extension: String,
        first: String,
        second: String,
    },
    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlobPattern { pattern: String, reason: String },
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },
    #[error("IO error reading configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SorterConfig {
    /// Catch-all category name. Defaults to "Others".
    #[serde(default)]
    pub default_category: Option<String>,

    /// Drop the built-in categories and use only those listed here.
    #[serde(default)]
    pub replace_defaults: bool,

    /// Category name to extension list.
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub filters: FilterRules,
}

/// Rules for leaving entries where they are.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterRules {
    /// Exact file names to leave in place.
    #[serde(default)]
    pub exclude_filenames: Vec<String>,

    /// Glob patterns matched against the file name.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub exclude_regex: Vec<String>,
}

impl SorterConfig {
    /// Loads configuration from `config_path`, or returns the built-in
    /// defaults when no path is given.
    ///
    /// No file is searched for implicitly.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Builds the category table this configuration describes.
    ///
    /// # Errors
    ///
    /// Fails if a category name is not a plain directory name, or if an
    /// extension ends up in two categories.
    pub fn category_table(&self) -> Result<CategoryTable, ConfigError> {
        let default_category = self
            .default_category
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        validate_category_name(&default_category)?;

        let mut categories = if self.replace_defaults {
            Vec::new()
        } else {
            default_categories()
                .into_iter()
                .filter(|category| !self.categories.contains_key(&category.name))
                .collect()
        };

        for (name, extensions) in &self.categories {
            validate_category_name(name)?;
            categories.push(Category::new(name.clone(), extensions));
        }

        CategoryTable::new(categories, default_category).map_err(|dup| {
            ConfigError::DuplicateExtension {
                extension: dup.extension,
                first: dup.first,
                second: dup.second,
            }
        })
    }

    /// Compiles the exclusion rules.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }
}

/// Category names become directory names, so they must be one normal component.
fn validate_category_name(name: &str) -> Result<(), ConfigError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(()),
        _ => Err(ConfigError::InvalidCategoryName(name.to_string())),
    }
}

/// Pre-compiled exclusion rules.
#[derive(Debug, Default)]
pub struct CompiledFilters {
    exclude_filenames: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = rules
            .exclude_patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| ConfigError::InvalidGlobPattern {
                    pattern: pattern.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = rules
            .exclude_regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            exclude_filenames: rules.exclude_filenames.iter().cloned().collect(),
            exclude_patterns,
            exclude_regexes,
        })
    }

    /// Returns true if the entry with this file name should be left in place.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.exclude_filenames.contains(file_name)
            || self
                .exclude_patterns
                .iter()
                .any(|pattern| pattern.matches(file_name))
            || self
                .exclude_regexes
                .iter()
                .any(|regex| regex.is_match(file_name))
    }
}
