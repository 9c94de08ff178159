//! Copy report models and mutable report builder.

use std::fmt;

/// Aggregate counters for one completed `copy_tree` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReportCopy {
    /// Destination directories created or reused (root included).
    pub cnt_dirs: u64,
    /// Non-directory entries copied.
    pub cnt_files: u64,
    /// Total bytes written to destination files.
    pub cnt_bytes: u64,
}

impl ReportCopy {
    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} dirs={} files={} bytes={}",
            self.cnt_dirs, self.cnt_files, self.cnt_bytes
        )
    }
}

impl fmt::Display for ReportCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[COPY]"))
    }
}

/// Mutable accumulator for copy statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportCopyBuilder {
    /// See [`ReportCopy::cnt_dirs`].
    pub cnt_dirs: u64,
    /// See [`ReportCopy::cnt_files`].
    pub cnt_files: u64,
    /// See [`ReportCopy::cnt_bytes`].
    pub cnt_bytes: u64,
}

impl ReportCopyBuilder {
    pub fn add_dir(&mut self) {
        self.cnt_dirs += 1;
    }

    /// Record one copied file and its byte count.
    pub fn add_file(&mut self, n_bytes: u64) {
        self.cnt_files += 1;
        self.cnt_bytes += n_bytes;
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportCopy {
        ReportCopy {
            cnt_dirs: self.cnt_dirs,
            cnt_files: self.cnt_files,
            cnt_bytes: self.cnt_bytes,
        }
    }
}
