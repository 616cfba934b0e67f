//! Extension based file categorization.
//!
//! A [`CategoryTable`] is built once at start-up from a list of [`Category`]
//! values and then answers "which directory does this file belong in?" with a
//! single hash lookup. Every file name maps to exactly one category; names
//! whose extension is unknown (or absent) land in the default category.
//!
//! # Examples
//!
//! ```
//! use dirsort::file_category::CategoryTable;
//!
//! let table = CategoryTable::default();
//! assert_eq!(table.classify("photo.JPG"), "Images");
//! assert_eq!(table.classify("archive.tar.gz"), "Archives");
//! assert_eq!(table.classify("README"), "Others");
//! ```

use std::collections::HashMap;

/// Name of the catch-all category used when no extension matches.
pub const DEFAULT_CATEGORY: &str = "Others";

/// A named group of file extensions.
///
/// Extensions are stored lowercase with their leading dot (".jpg").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Directory name the category's files are moved into.
    pub name: String,
    /// Normalized extensions, e.g. ".jpg".
    pub extensions: Vec<String>,
}

impl Category {
    /// Creates a category, normalizing each extension to lowercase with a leading dot.
    pub fn new<I, S>(name: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            extensions: extensions
                .into_iter()
                .map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
        }
    }
}

/// Lowercases an extension and makes sure it starts with a dot.
pub fn normalize_extension(ext: &str) -> String {
    let lower = ext.trim().to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}

/// Splits a file name into stem and extension at the last dot.
///
/// Leading dots belong to the stem, so `.bashrc` and `..txt` have no
/// extension. A trailing dot is returned as the extension `"."`.
///
/// ```
/// use dirsort::file_category::split_extension;
///
/// assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
/// assert_eq!(split_extension("..txt"), ("..txt", ""));
/// assert_eq!(split_extension("trailing."), ("trailing", "."));
/// ```
pub fn split_extension(file_name: &str) -> (&str, &str) {
    let leading_dots = file_name.len() - file_name.trim_start_matches('.').len();
    match file_name[leading_dots..].rfind('.') {
        Some(pos) => file_name.split_at(leading_dots + pos),
        None => (file_name, ""),
    }
}

/// Returns the lowercase extension of a file name, including the dot.
///
/// Only the final suffix counts, so `archive.tar.gz` yields `.gz`. Names
/// without an extension, names ending in a dot, and names made of leading
/// dots plus a word (`.bashrc`, `..txt`) yield an empty string.
///
/// ```
/// use dirsort::file_category::extension_of;
///
/// assert_eq!(extension_of("photo.JPG"), ".jpg");
/// assert_eq!(extension_of("archive.tar.gz"), ".gz");
/// assert_eq!(extension_of(".bashrc"), "");
/// assert_eq!(extension_of("Makefile"), "");
/// ```
pub fn extension_of(file_name: &str) -> String {
    match split_extension(file_name) {
        (_, ext) if ext.len() > 1 => ext.to_lowercase(),
        _ => String::new(),
    }
}

/// The built-in category table.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new(
            "Images",
            [".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".svg"],
        ),
        Category::new(
            "Documents",
            [
                ".txt", ".pdf", ".docx", ".doc", ".xlsx", ".xls", ".pptx", ".ppt", ".odt",
            ],
        ),
        Category::new("Videos", [".mp4", ".avi", ".mov", ".mkv", ".flv", ".wmv"]),
        Category::new("Music", [".mp3", ".wav", ".aac", ".flac", ".ogg"]),
        Category::new("Archives", [".zip", ".rar", ".tar", ".gz", ".bz2", ".7z"]),
        Category::new(
            "Scripts",
            [".py", ".js", ".html", ".css", ".php", ".sh", ".bat"],
        ),
    ]
}

/// Immutable lookup table from extension to category name.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    categories: Vec<Category>,
    extension_map: HashMap<String, usize>,
    default_category: String,
}

impl CategoryTable {
    /// Builds the table from a list of categories.
    ///
    /// Returns the offending extension and both category names if an
    /// extension is listed under two different categories.
    pub fn new(
        categories: Vec<Category>,
        default_category: impl Into<String>,
    ) -> Result<Self, DuplicateExtension> {
        Ok(Self {
            extension_map: index_extensions(&categories)?,
            categories,
            default_category: default_category.into(),
        })
    }

    /// Returns the category name for a file name. Never fails.
    pub fn classify(&self, file_name: &str) -> &str {
        self.category_for_extension(&extension_of(file_name))
    }

    /// Returns the category name for an extension (with or without the dot).
    pub fn category_for_extension(&self, ext: &str) -> &str {
        if ext.is_empty() {
            return &self.default_category;
        }
        self.extension_map
            .get(&normalize_extension(ext))
            .map(|&index| self.categories[index].name.as_str())
            .unwrap_or(self.default_category.as_str())
    }

    /// The categories in the order they were given.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The catch-all category name.
    pub fn default_category(&self) -> &str {
        &self.default_category
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::new(default_categories(), DEFAULT_CATEGORY)
            .expect("Built-in categories must not share extensions")
    }
}

/// Maps every extension to the index of its category.
fn index_extensions(
    categories: &[Category],
) -> Result<HashMap<String, usize>, DuplicateExtension> {
    let mut extension_map: HashMap<String, usize> = HashMap::new();

    for (index, category) in categories.iter().enumerate() {
        for ext in &category.extensions {
            if let Some(&previous) = extension_map.get(ext)
                && previous != index
            {
                return Err(DuplicateExtension {
                    extension: ext.clone(),
                    first: categories[previous].name.clone(),
                    second: category.name.clone(),
                });
            }
            extension_map.insert(ext.clone(), index);
        }
    }

    Ok(extension_map)
}

/// An extension claimed by two categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateExtension {
    pub extension: String,
    pub first: String,
    pub second: String,
}
