//! `sitekit_io_fs` v1:
//! Rust-side static-site packaging engine.
//!
//! Modules:
//! - `copy`   : source scan and copy orchestration
//! - `spec`   : enums/options/rename rule/errors
//! - `report` : run-time report model
//! - `util`   : shared helper functions

pub mod copy;
pub mod report;
pub mod spec;
mod util;

pub use copy::{plan_build, run_build, run_build_with_progress};
pub use report::{ReportBuild, ReportBuildBuilder};
pub use spec::{
    BuildError, C_SUFFIX_HTML, EnumBuildFileConflictStrategy, EnumBuildPatternMode,
    SpecBuildOptions, SpecCopyRecord, SpecRenameRule,
};
