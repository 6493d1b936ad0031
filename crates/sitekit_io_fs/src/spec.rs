//! Build specification models and top-level error types.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// File name suffix selected by default.
pub const C_SUFFIX_HTML: &str = ".html";

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Pattern matching mode for the file selection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumBuildPatternMode {
    /// Case-sensitive `ends_with` on the file name.
    Suffix,
    /// Shell-like wildcards (`*`, `?`, character classes).
    Glob,
    /// Regular expression pattern.
    Regex,
}

/// Existing destination file conflict policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumBuildFileConflictStrategy {
    /// Replace destination file with source file.
    Overwrite,
    /// Keep destination file and skip current source file.
    Skip,
    /// Abort the run.
    Error,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RenameRule

/// One-step file name lookup table.
///
/// Names without an entry map to themselves. The table is never applied to
/// its own output, so `home.html -> index.html` does not continue on to
/// `main.html`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRenameRule {
    map_names: BTreeMap<String, String>,
}

impl SpecRenameRule {
    /// Rule with no entries (identity for every name).
    pub fn identity() -> Self {
        Self {
            map_names: BTreeMap::new(),
        }
    }

    /// Build a rule from `(source, destination)` pairs.
    pub fn from_pairs<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            map_names: pairs
                .into_iter()
                .map(|(src, dst)| (src.into(), dst.into()))
                .collect(),
        }
    }

    /// Destination name for `name_source`.
    pub fn apply<'a>(&'a self, name_source: &'a str) -> &'a str {
        self.map_names
            .get(name_source)
            .map(String::as_str)
            .unwrap_or(name_source)
    }

    /// Whether `name_source` has an explicit entry.
    pub fn is_renamed(&self, name_source: &str) -> bool {
        self.map_names.contains_key(name_source)
    }

    pub fn len(&self) -> usize {
        self.map_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map_names.is_empty()
    }
}

impl Default for SpecRenameRule {
    /// `home.html -> index.html`, `index.html -> main.html`.
    fn default() -> Self {
        Self::from_pairs([("home.html", "index.html"), ("index.html", "main.html")])
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `run_build`.
#[derive(Debug, Clone)]
pub struct SpecBuildOptions {
    /// Selection pattern applied to file basename.
    pub pattern_include_files: String,
    /// Pattern interpretation mode.
    pub rule_pattern: EnumBuildPatternMode,
    /// File name substitution applied to every selected file.
    pub rule_rename: SpecRenameRule,
    /// Conflict behavior for destination files.
    pub rule_conflict_file: EnumBuildFileConflictStrategy,
    /// Carry permissions, timestamps and xattrs over to the copy.
    pub if_preserve_metadata: bool,
    /// Do not mutate filesystem; record what would happen.
    pub if_dry_run: bool,
}

impl Default for SpecBuildOptions {
    fn default() -> Self {
        Self {
            pattern_include_files: C_SUFFIX_HTML.to_string(),
            rule_pattern: EnumBuildPatternMode::Suffix,
            rule_rename: SpecRenameRule::default(),
            rule_conflict_file: EnumBuildFileConflictStrategy::Overwrite,
            if_preserve_metadata: false,
            if_dry_run: false,
        }
    }
}

/// One copied (or planned) file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCopyRecord {
    /// File name inside the source directory.
    pub name_source: String,
    /// File name inside the destination directory.
    pub name_destination: String,
    pub path_source: PathBuf,
    pub path_destination: PathBuf,
}

/// Filesystem failures that abort a build run.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Source path is missing or not a directory.
    #[error("Source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),
    /// Source and destination resolve to the same directory.
    #[error(
        "Source and destination are the same directory: {} <-> {}",
        .path_source.display(),
        .path_destination.display()
    )]
    SourceDestinationSame {
        path_source: PathBuf,
        path_destination: PathBuf,
    },
    /// Invalid selection pattern.
    #[error("Invalid file pattern: {0}")]
    InvalidPattern(String),
    /// Destination directory initialization failed.
    #[error("Failed to initialize destination {}: {source}", .path.display())]
    DestinationInitFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Listing or inspecting the source directory failed.
    #[error("Failed to read source {}: {source}", .path.display())]
    ReadSourceFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Destination file exists and the conflict rule is `Error`.
    #[error("Destination exists: {}", .0.display())]
    DestinationConflict(PathBuf),
    /// Copying one file failed.
    #[error(
        "Failed to copy {} -> {}: {source}",
        .path_source.display(),
        .path_destination.display()
    )]
    CopyFailed {
        path_source: PathBuf,
        path_destination: PathBuf,
        #[source]
        source: io::Error,
    },
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
