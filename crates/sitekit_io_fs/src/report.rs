//! Build report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;

use crate::spec::SpecCopyRecord;

/// Aggregate counters and per-file records for one `run_build` call.
#[derive(Debug, Default, Clone)]
pub struct ReportBuild {
    /// Total entries listed directly under the source directory.
    pub cnt_scanned: u64,
    /// Number of listed entries whose name passed the selection rule.
    pub cnt_matched: u64,
    /// Number of files copied (or planned, on dry run).
    pub cnt_copied: u64,
    /// Number of matched entries that were not copied.
    pub cnt_skipped: u64,
    /// One record per copied file, in processing order.
    pub records: Vec<SpecCopyRecord>,
    /// Non-fatal warnings collected during the scan.
    pub warnings: Vec<String>,
}

impl ReportBuild {
    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_matched".to_string(), self.cnt_matched);
        dict_counts.insert("cnt_copied".to_string(), self.cnt_copied);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} scanned={} matched={} copied={} skipped={} warnings={}",
            dict_counts["cnt_scanned"],
            dict_counts["cnt_matched"],
            dict_counts["cnt_copied"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[BUILD]"))
    }
}

/// Mutable accumulator for build statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportBuildBuilder {
    /// See [`ReportBuild::cnt_scanned`].
    pub cnt_scanned: u64,
    /// See [`ReportBuild::cnt_matched`].
    pub cnt_matched: u64,
    /// See [`ReportBuild::cnt_skipped`].
    pub cnt_skipped: u64,
    /// See [`ReportBuild::records`].
    pub records: Vec<SpecCopyRecord>,
    /// See [`ReportBuild::warnings`].
    pub warnings: Vec<String>,
}

impl ReportBuildBuilder {
    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    pub fn add_matched(&mut self) {
        self.cnt_matched += 1;
    }

    pub fn add_skipped(&mut self) {
        self.cnt_skipped += 1;
    }

    /// Record one copied file; the copied count follows the record list.
    pub fn add_copied(&mut self, spec_record: SpecCopyRecord) {
        self.records.push(spec_record);
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportBuild {
        ReportBuild {
            cnt_scanned: self.cnt_scanned,
            cnt_matched: self.cnt_matched,
            cnt_copied: self.records.len() as u64,
            cnt_skipped: self.cnt_skipped,
            records: self.records,
            warnings: self.warnings,
        }
    }
}
