//! Source directory scan and copy orchestration.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::report::{ReportBuild, ReportBuildBuilder};
use crate::spec::{BuildError, SpecBuildOptions, SpecCopyRecord};
use crate::util::{TypeBuildPattern, copy_file, is_same_directory, should_skip_file_conflict};

#[derive(Debug, Clone)]
struct SpecFileEntry {
    path_file_src: PathBuf,
    name_file: String,
    name_file_dst: String,
}

impl SpecFileEntry {
    fn is_renamed(&self) -> bool {
        self.name_file != self.name_file_dst
    }
}

/// Copy selected files from `dir_source` into `dir_destination`.
///
/// Equivalent to [`run_build_with_progress`] with a hook that logs each
/// copied file at `info` level.
pub fn run_build<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_build_options: SpecBuildOptions,
) -> Result<ReportBuild, BuildError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    run_build_with_progress(
        dir_source,
        dir_destination,
        spec_build_options,
        |spec_record| {
            info!(
                source = %spec_record.name_source,
                destination = %spec_record.name_destination,
                "copied"
            );
        },
    )
}

/// Copy selected files from `dir_source` into `dir_destination`, calling
/// `on_copied` right after each file lands.
///
/// Behavior is controlled by [`SpecBuildOptions`]:
/// - the selection pattern decides which names directly under `dir_source`
///   are taken (no recursion),
/// - the rename rule maps each original name to its destination name in one
///   lookup,
/// - the conflict rule decides what happens to existing destination files,
/// - dry-run records the plan without creating or writing anything.
///
/// Pass-through files are copied before renamed files, each group in name
/// order, so a renamed output overwrites a same-named pass-through copy.
///
/// The first filesystem failure aborts the run. Files copied before it stay
/// on disk and have already been passed to `on_copied`.
pub fn run_build_with_progress<P, Q, F>(
    dir_source: P,
    dir_destination: Q,
    spec_build_options: SpecBuildOptions,
    mut on_copied: F,
) -> Result<ReportBuild, BuildError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: FnMut(&SpecCopyRecord),
{
    let path_dir_src = dir_source.as_ref().to_path_buf();
    let path_dir_dst = dir_destination.as_ref().to_path_buf();

    if !path_dir_src.is_dir() {
        return Err(BuildError::SourceNotDirectory(path_dir_src));
    }
    let pattern = TypeBuildPattern::from_raw(
        &spec_build_options.pattern_include_files,
        spec_build_options.rule_pattern,
    )?;
    if is_same_directory(&path_dir_src, &path_dir_dst) {
        return Err(BuildError::SourceDestinationSame {
            path_source: path_dir_src,
            path_destination: path_dir_dst,
        });
    }

    let if_dry_run = spec_build_options.if_dry_run;
    if !if_dry_run {
        fs::create_dir_all(&path_dir_dst).map_err(|e| BuildError::DestinationInitFailed {
            path: path_dir_dst.clone(),
            source: e,
        })?;
    }
    debug!(
        source = %path_dir_src.display(),
        destination = %path_dir_dst.display(),
        dry_run = if_dry_run,
        "build started"
    );

    let mut builder_build_report = ReportBuildBuilder::default();
    let l_entries = scan_source_directory(
        &path_dir_src,
        &pattern,
        &spec_build_options,
        &mut builder_build_report,
    )?;

    let mut set_names_written: HashSet<String> = HashSet::new();
    for spec_file_entry in l_entries {
        let path_file_dst = path_dir_dst.join(&spec_file_entry.name_file_dst);
        if should_skip_file_conflict(
            &path_file_dst,
            set_names_written.contains(&spec_file_entry.name_file_dst),
            spec_build_options.rule_conflict_file,
        )? {
            debug!(destination = %path_file_dst.display(), "destination exists, skipped");
            builder_build_report.add_skipped();
            continue;
        }

        if !if_dry_run {
            copy_file(
                &spec_file_entry.path_file_src,
                &path_file_dst,
                spec_build_options.if_preserve_metadata,
            )
            .map_err(|e| BuildError::CopyFailed {
                path_source: spec_file_entry.path_file_src.clone(),
                path_destination: path_file_dst.clone(),
                source: e,
            })?;
        }

        set_names_written.insert(spec_file_entry.name_file_dst.clone());
        let spec_record = SpecCopyRecord {
            name_source: spec_file_entry.name_file,
            name_destination: spec_file_entry.name_file_dst,
            path_source: spec_file_entry.path_file_src,
            path_destination: path_file_dst,
        };
        on_copied(&spec_record);
        builder_build_report.add_copied(spec_record);
    }

    let report = builder_build_report.build();
    debug!("{report}");
    Ok(report)
}

/// Records a run would produce, without touching the filesystem.
pub fn plan_build<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_build_options: SpecBuildOptions,
) -> Result<Vec<SpecCopyRecord>, BuildError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let spec_build_options = SpecBuildOptions {
        if_dry_run: true,
        ..spec_build_options
    };
    let report = run_build_with_progress(dir_source, dir_destination, spec_build_options, |_| {})?;
    Ok(report.records)
}

fn scan_source_directory(
    path_dir_src: &Path,
    pattern: &TypeBuildPattern,
    spec_build_options: &SpecBuildOptions,
    builder_build_report: &mut ReportBuildBuilder,
) -> Result<Vec<SpecFileEntry>, BuildError> {
    let err_read_source = |e: std::io::Error| BuildError::ReadSourceFailed {
        path: path_dir_src.to_path_buf(),
        source: e,
    };

    let mut l_files: Vec<SpecFileEntry> = Vec::new();
    for entry_res in fs::read_dir(path_dir_src).map_err(err_read_source)? {
        let entry = entry_res.map_err(err_read_source)?;
        builder_build_report.add_scanned();

        let path_entry = entry.path();
        let Ok(name_file) = entry.file_name().into_string() else {
            let warning = format!("Non UTF-8 file name skipped: {}", path_entry.display());
            warn!("{warning}");
            builder_build_report.add_warning(warning);
            continue;
        };
        if !pattern.is_match(&name_file) {
            continue;
        }
        builder_build_report.add_matched();

        let cfg_file_type = entry.file_type().map_err(|e| BuildError::ReadSourceFailed {
            path: path_entry.clone(),
            source: e,
        })?;
        let b_is_file = if cfg_file_type.is_symlink() {
            // Links count as files when their target is one.
            fs::metadata(&path_entry).is_ok_and(|meta| meta.is_file())
        } else {
            cfg_file_type.is_file()
        };
        if !b_is_file {
            let warning = format!("Not a regular file, skipped: {}", path_entry.display());
            warn!("{warning}");
            builder_build_report.add_warning(warning);
            builder_build_report.add_skipped();
            continue;
        }

        let name_file_dst = spec_build_options.rule_rename.apply(&name_file).to_string();
        l_files.push(SpecFileEntry {
            path_file_src: path_entry,
            name_file,
            name_file_dst,
        });
    }

    l_files.sort_by(|a, b| {
        a.is_renamed()
            .cmp(&b.is_renamed())
            .then_with(|| a.name_file.cmp(&b.name_file))
    });
    Ok(l_files)
}
