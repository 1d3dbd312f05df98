use std::path::{Path, PathBuf};

/// Outcome of processing a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// File was already in canonical layout.
    Unchanged,
    /// File was rewritten (or would be, under --check/--diff).
    Changed,
    /// The file could not be processed.
    Error,
}

#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub status: FileStatus,
    pub error: Option<String>,
}

impl FileResult {
    pub fn new(path: &Path, status: FileStatus) -> Self {
        Self {
            path: path.to_path_buf(),
            status,
            error: None,
        }
    }

    pub fn error(path: &Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            status: FileStatus::Error,
            error: Some(message),
        }
    }
}

/// Aggregated results of a run over many files.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<FileResult>,
    changed: usize,
    unchanged: usize,
    errors: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: FileResult) {
        match result.status {
            FileStatus::Changed => self.changed += 1,
            FileStatus::Unchanged => self.unchanged += 1,
            FileStatus::Error => self.errors += 1,
        }
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn has_changes(&self) -> bool {
        self.changed > 0
    }

    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} file(s) processed", self.total())];
        if self.changed > 0 {
            parts.push(format!("{} reformatted", self.changed));
        }
        if self.unchanged > 0 {
            parts.push(format!("{} unchanged", self.unchanged));
        }
        if self.errors > 0 {
            parts.push(format!("{} error(s)", self.errors));
        }
        parts.join(", ")
    }

    pub fn print_errors(&self) {
        for result in &self.results {
            if let Some(ref error) = result.error {
                eprintln!("error: {}: {}", result.path.display(), error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_and_summary() {
        let mut report = Report::new();
        report.add(FileResult::new(Path::new("a.sql"), FileStatus::Changed));
        report.add(FileResult::new(Path::new("b.sql"), FileStatus::Unchanged));
        report.add(FileResult::error(
            Path::new("c.sql"),
            "read error".to_string(),
        ));

        assert_eq!(report.total(), 3);
        assert!(report.has_changes());
        assert!(report.has_errors());
        let summary = report.summary();
        assert!(summary.contains("3 file(s) processed"));
        assert!(summary.contains("1 reformatted"));
        assert!(summary.contains("1 unchanged"));
        assert!(summary.contains("1 error(s)"));
    }

    #[test]
    fn test_empty_report() {
        let report = Report::new();
        assert!(!report.has_changes());
        assert!(!report.has_errors());
        assert_eq!(report.summary(), "0 file(s) processed");
    }
}
