/// Moving files into category directories.
///
/// This module walks a single directory level, classifies every non-directory
/// entry, and renames it into `<source>/<category>/`. Name collisions are
/// resolved with a numeric suffix before the move, and a failure on one entry
/// is reported and skipped without aborting the run.
use crate::config::CompiledFilters;
use crate::file_category::{CategoryTable, split_extension};
use crate::observer::OrganizeObserver;
use std::ffi::{OsStr, OsString};
use std::fs::{self, DirEntry};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during file organization.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The source path is missing or is not a directory.
    #[error("The directory {} does not exist.", path.display())]
    NotADirectory { path: PathBuf },
    /// The source directory could not be listed.
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The type of a directory entry could not be determined.
    #[error("Failed to inspect {}: {source}", path.display())]
    InspectFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a category directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file to its category directory.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    FileMoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// A single move, performed or (in a dry run) planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// The path of the file before organization.
    pub original_path: PathBuf,
    /// The path the file was (or would be) moved to.
    pub new_path: PathBuf,
    /// The category the file was classified into.
    pub category: String,
}

/// What a call to [`FileOrganizer::process`] did.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Moves performed, or planned when `dry_run` is set.
    pub operations: Vec<Operation>,
    /// Directories left alone.
    pub skipped: usize,
    /// Entries matched by an exclusion rule.
    pub excluded: usize,
    /// Entries that could not be organized.
    pub failed: usize,
    /// Whether `operations` were only planned.
    pub dry_run: bool,
}

impl RunSummary {
    /// Number of files actually moved.
    pub fn moved(&self) -> usize {
        if self.dry_run {
            0
        } else {
            self.operations.len()
        }
    }
}

/// Organizes the files of one directory into category subdirectories.
#[derive(Debug)]
pub struct FileOrganizer {
    table: CategoryTable,
    filters: CompiledFilters,
    dry_run: bool,
}

impl FileOrganizer {
    /// Creates an organizer that uses `table` and excludes nothing.
    pub fn new(table: CategoryTable) -> Self {
        Self {
            table,
            filters: CompiledFilters::default(),
            dry_run: false,
        }
    }

    /// Leaves entries matched by `filters` in place.
    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    /// When set, nothing on disk is touched; planned moves are reported instead.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Organizes every non-directory entry directly inside `source_dir`.
    ///
    /// The caller is expected to have checked that `source_dir` is a
    /// directory. Only a failure to list it is returned as an error; problems
    /// with individual entries go to `observer.on_error` and the run goes on.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirsort::file_category::CategoryTable;
    /// use dirsort::file_organizer::FileOrganizer;
    /// use dirsort::observer::TracingObserver;
    /// use std::path::Path;
    ///
    /// let organizer = FileOrganizer::new(CategoryTable::default());
    /// let summary = organizer
    ///     .process(Path::new("/home/user/Downloads"), &mut TracingObserver)
    ///     .expect("listing failed");
    /// println!("moved {} files", summary.moved());
    /// ```
    pub fn process(
        &self,
        source_dir: &Path,
        observer: &mut dyn OrganizeObserver,
    ) -> OrganizeResult<RunSummary> {
        let mut summary = RunSummary {
            dry_run: self.dry_run,
            ..Default::default()
        };

        // Snapshot the listing first so the directories created below are never visited.
        let mut entries: Vec<DirEntry> = Vec::new();
        for entry in fs::read_dir(source_dir).map_err(|source| OrganizeError::ReadDirFailed {
            path: source_dir.to_path_buf(),
            source,
        })? {
            match entry {
                Ok(entry) => entries.push(entry),
                Err(source) => {
                    summary.failed += 1;
                    observer.on_error(
                        &source_dir.display().to_string(),
                        &OrganizeError::ReadDirFailed {
                            path: source_dir.to_path_buf(),
                            source,
                        },
                    );
                }
            }
        }
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            let path = entry.path();

            // file_type() does not follow symlinks: a link to a directory is moved like a file.
            let is_dir = match entry.file_type() {
                Ok(file_type) => file_type.is_dir(),
                Err(source) => {
                    summary.failed += 1;
                    observer.on_error(&name, &OrganizeError::InspectFailed { path, source });
                    continue;
                }
            };

            if is_dir {
                summary.skipped += 1;
                observer.on_skip(&name);
                continue;
            }

            if self.filters.is_excluded(&name) {
                summary.excluded += 1;
                observer.on_exclude(&name);
                continue;
            }

            let category = self.table.classify(&name);

            if self.dry_run {
                let new_path = handle_duplicates(&source_dir.join(category).join(&file_name));
                observer.on_plan(&name, category);
                summary.operations.push(Operation {
                    original_path: path,
                    new_path,
                    category: category.to_string(),
                });
                continue;
            }

            match move_to_category(source_dir, &path, &file_name, category) {
                Ok(new_path) => {
                    observer.on_move(&name, category);
                    summary.operations.push(Operation {
                        original_path: path,
                        new_path,
                        category: category.to_string(),
                    });
                }
                Err(e) => {
                    summary.failed += 1;
                    observer.on_error(&name, &e);
                }
            }
        }

        Ok(summary)
    }
}

/// Moves `file_path` into `source_dir/category`, creating the directory if
/// needed and picking a free name. Returns the final destination.
fn move_to_category(
    source_dir: &Path,
    file_path: &Path,
    file_name: &OsStr,
    category: &str,
) -> OrganizeResult<PathBuf> {
    let category_path = source_dir.join(category);

    fs::create_dir_all(&category_path).map_err(|source| OrganizeError::DirectoryCreationFailed {
        path: category_path.clone(),
        source,
    })?;

    let destination = handle_duplicates(&category_path.join(file_name));

    fs::rename(file_path, &destination).map_err(|source| OrganizeError::FileMoveFailed {
        from: file_path.to_path_buf(),
        to: destination.clone(),
        source,
    })?;

    Ok(destination)
}

/// Returns `candidate` if nothing occupies it, otherwise the first free
/// `stem(N)ext` next to it, probing N = 1, 2, 3, ...
///
/// The name is split like [`split_extension`], so `..txt` becomes `..txt(1)`.
///
/// A dangling symlink counts as occupied. The check is not atomic with the
/// move that follows it.
///
/// ```
/// use dirsort::file_organizer::handle_duplicates;
/// use std::path::Path;
///
/// let free = Path::new("/nonexistent/dir/report.pdf");
/// assert_eq!(handle_duplicates(free), free);
/// ```
pub fn handle_duplicates(candidate: &Path) -> PathBuf {
    if !is_occupied(candidate) {
        return candidate.to_path_buf();
    }

    let parent = candidate.parent().unwrap_or_else(|| Path::new(""));
    let (stem, extension) = split_file_name(candidate);

    let mut counter: u64 = 1;
    loop {
        let mut name = stem.clone();
        name.push(format!("({})", counter));
        name.push(&extension);

        let probe = parent.join(name);
        if !is_occupied(&probe) {
            return probe;
        }
        counter += 1;
    }
}

/// Stem and extension (with its dot) of the final path component.
fn split_file_name(path: &Path) -> (OsString, OsString) {
    let file_name = path.file_name().unwrap_or_default();
    if let Some(name) = file_name.to_str() {
        let (stem, extension) = split_extension(name);
        return (stem.into(), extension.into());
    }

    // Not valid UTF-8: fall back to the platform split.
    let stem = path.file_stem().unwrap_or(file_name).to_os_string();
    let mut extension = OsString::new();
    if let Some(ext) = path.extension() {
        extension.push(".");
        extension.push(ext);
    }
    (stem, extension)
}

fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
