//! `sitekit-build`: package `site/*.html` into `dist/`.
//!
//! Both directories are fixed and resolved against the workspace root.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sitekit_io_fs::{BuildError, SpecBuildOptions, SpecCopyRecord, run_build_with_progress};
use thiserror::Error;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const C_DIR_SOURCE: &str = "site";
const C_DIR_DESTINATION: &str = "dist";
const C_LOG_FILTER: &str = "warn";

/// Failures that end the process with a non-zero exit.
#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("Failed to write console output: {0}")]
    Console(#[from] io::Error),
}

fn main() -> Result<(), RunError> {
    init_logging();

    let path_root = dir_workspace_root();
    debug!(root = %path_root.display(), "resolved workspace root");

    let mut stdout = io::stdout().lock();
    run(
        &path_root.join(C_DIR_SOURCE),
        &path_root.join(C_DIR_DESTINATION),
        &mut stdout,
    )?;
    Ok(())
}

/// Build `path_dir_src` into `path_dir_dst`, writing one line per copied
/// file and then the summary line to `out`. Returns the copied count.
fn run<W: Write>(path_dir_src: &Path, path_dir_dst: &Path, out: &mut W) -> Result<u64, RunError> {
    let mut res_console: io::Result<()> = Ok(());
    let report = run_build_with_progress(
        path_dir_src,
        path_dir_dst,
        SpecBuildOptions::default(),
        |spec_record| {
            if res_console.is_ok() {
                res_console = writeln!(out, "{}", format_copied_line(spec_record));
            }
        },
    )?;
    res_console?;
    debug!("{report}");

    let name_dir_dst = path_dir_dst
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| C_DIR_DESTINATION.to_string());
    writeln!(out, "{}", format_summary_line(report.cnt_copied, &name_dir_dst))?;
    Ok(report.cnt_copied)
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(C_LOG_FILTER))
        .init();
}

fn dir_workspace_root() -> PathBuf {
    // crates/sitekit_build -> workspace root
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn format_copied_line(spec_record: &SpecCopyRecord) -> String {
    format!(
        "✓ Copied {} → {}",
        spec_record.name_source, spec_record.name_destination
    )
}

fn format_summary_line(n_copied: u64, name_dir_dst: &str) -> String {
    format!("✓ Build complete! {n_copied} HTML files copied to {name_dir_dst}/")
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    use sitekit_io_fs::{BuildError, SpecCopyRecord};

    use super::{RunError, dir_workspace_root, format_copied_line, format_summary_line, run};

    static N_TEST_DIRS: AtomicU64 = AtomicU64::new(0);

    struct TestDir {
        path: PathBuf,
    }

    impl TestDir {
        fn new() -> Self {
            let n = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos();
            let n_seq = N_TEST_DIRS.fetch_add(1, Ordering::Relaxed);
            let path = std::env::temp_dir().join(format!("sitekit_build_test_{n}_{n_seq}"));
            std::fs::create_dir_all(&path).expect("create test dir");
            Self { path }
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    #[test]
    fn run_prints_one_line_per_file_then_summary() {
        let tmp = TestDir::new();
        let src = tmp.path().join("site");
        let dst = tmp.path().join("dist");
        std::fs::create_dir_all(&src).expect("create src");
        std::fs::write(src.join("home.html"), "home").expect("write home");
        std::fs::write(src.join("index.html"), "index").expect("write index");
        std::fs::write(src.join("about.html"), "about").expect("write about");
        std::fs::write(src.join("readme.txt"), "readme").expect("write readme");

        let mut out = Vec::new();
        let n_copied = run(&src, &dst, &mut out).expect("run");
        assert_eq!(n_copied, 3);
        assert_eq!(
            String::from_utf8(out).expect("utf-8 output"),
            "✓ Copied about.html → about.html\n\
             ✓ Copied home.html → index.html\n\
             ✓ Copied index.html → main.html\n\
             ✓ Build complete! 3 HTML files copied to dist/\n"
        );
        assert_eq!(std::fs::read_to_string(dst.join("index.html")).expect("read"), "home");
    }

    #[test]
    fn run_missing_source_fails_without_summary() {
        let tmp = TestDir::new();
        let src = tmp.path().join("site");
        let dst = tmp.path().join("dist");

        let mut out = Vec::new();
        let err = run(&src, &dst, &mut out).expect_err("missing source must fail");
        assert!(matches!(
            err,
            RunError::Build(BuildError::SourceNotDirectory(_))
        ));
        assert!(out.is_empty());
        assert!(!dst.exists());
    }

    #[test]
    fn copied_line_shows_both_names() {
        let spec_record = SpecCopyRecord {
            name_source: "home.html".to_string(),
            name_destination: "index.html".to_string(),
            path_source: PathBuf::from("site/home.html"),
            path_destination: PathBuf::from("dist/index.html"),
        };
        assert_eq!(
            format_copied_line(&spec_record),
            "✓ Copied home.html → index.html"
        );
    }

    #[test]
    fn summary_line_reports_count() {
        assert_eq!(
            format_summary_line(3, "dist"),
            "✓ Build complete! 3 HTML files copied to dist/"
        );
        assert_eq!(
            format_summary_line(0, "dist"),
            "✓ Build complete! 0 HTML files copied to dist/"
        );
    }

    #[test]
    fn workspace_root_holds_site_sources() {
        let path_root = dir_workspace_root();
        assert!(path_root.join("Cargo.toml").is_file());
        assert!(path_root.join("site").is_dir());
    }
}
