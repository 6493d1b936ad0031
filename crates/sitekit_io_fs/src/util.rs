use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use regex::Regex;

use crate::spec::{BuildError, EnumBuildFileConflictStrategy, EnumBuildPatternMode};

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

#[derive(Debug, Clone)]
pub(crate) enum TypeBuildPattern {
    Suffix(String),
    Glob(GlobMatcher),
    Regex(Regex),
}

impl TypeBuildPattern {
    pub(crate) fn from_raw(
        pattern: &str,
        rule_pattern: EnumBuildPatternMode,
    ) -> Result<Self, BuildError> {
        match rule_pattern {
            EnumBuildPatternMode::Suffix => Ok(Self::Suffix(pattern.to_string())),
            EnumBuildPatternMode::Glob => {
                let matcher = Glob::new(pattern)
                    .map_err(|e| BuildError::InvalidPattern(e.to_string()))?
                    .compile_matcher();
                Ok(Self::Glob(matcher))
            }
            EnumBuildPatternMode::Regex => {
                let regex =
                    Regex::new(pattern).map_err(|e| BuildError::InvalidPattern(e.to_string()))?;
                Ok(Self::Regex(regex))
            }
        }
    }

    pub(crate) fn is_match(&self, name_file: &str) -> bool {
        match self {
            Self::Suffix(suffix) => name_file.ends_with(suffix.as_str()),
            Self::Glob(matcher) => matcher.is_match(name_file),
            Self::Regex(regex) => regex.is_match(name_file),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

fn _normalize_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

pub(crate) fn is_same_directory(src: &Path, dst: &Path) -> bool {
    _normalize_path(src) == _normalize_path(dst)
}

/// Decide whether an existing destination file blocks the copy.
///
/// `if_written_this_run` marks a name an earlier entry already produced,
/// which a dry run cannot see on disk. Returns `Ok(true)` when the file must
/// be skipped.
pub(crate) fn should_skip_file_conflict(
    path_dst: &Path,
    if_written_this_run: bool,
    rule_conflict: EnumBuildFileConflictStrategy,
) -> Result<bool, BuildError> {
    if !if_written_this_run && !path_dst.exists() {
        return Ok(false);
    }

    match rule_conflict {
        EnumBuildFileConflictStrategy::Overwrite => Ok(false),
        EnumBuildFileConflictStrategy::Skip => Ok(true),
        EnumBuildFileConflictStrategy::Error => {
            Err(BuildError::DestinationConflict(path_dst.to_path_buf()))
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FileCopy

pub(crate) fn copy_file(
    path_file_src: &Path,
    path_file_dst: &Path,
    if_preserve_metadata: bool,
) -> Result<(), io::Error> {
    fs::copy(path_file_src, path_file_dst)?;
    if if_preserve_metadata {
        apply_metadata(path_file_src, path_file_dst)?;
    }
    Ok(())
}

fn apply_metadata(path_file_src: &Path, path_file_dst: &Path) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    let stat_src = fs::metadata(path_file_src)?;
    fs::set_permissions(path_file_dst, stat_src.permissions())?;

    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)?;

    #[cfg(target_os = "linux")]
    copy_xattrs_linux(path_file_src, path_file_dst);
    Ok(())
}

#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let iter_xattr_names = match xattr::list(path_file_src) {
        Ok(v) => v,
        Err(_) => return,
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        let _ = xattr::set(path_file_dst, &name, &raw_value);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
