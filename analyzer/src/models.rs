use chrono::{DateTime, Utc};
use serde::Serialize;

/// A log file that was discovered but could not be parsed. The file
/// contributes no records; the batch continues.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub description: String,
}

/// Aggregate counters for one batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchStats {
    /// Log files discovered by the scanner.
    pub files_found: usize,
    /// Files parsed successfully. Failed files count as ignored.
    pub files_processed: usize,
    /// Server-side match records produced across all files.
    pub server_matches: usize,
    /// Records that never saw a match-ended marker.
    pub unfinished_matches: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl BatchStats {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Discrete progress notification, emitted after each file completes.
/// Percentages are non-decreasing; the final one is 100.
#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub percent: u8,
    pub file: String,
}

/// Everything a batch run produced. Delivered once, after the worker
/// has finished (or aborted on an unexpected fault).
#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub records: Vec<parser::MatchRecord>,
    pub warnings: Vec<parser::ParseWarning>,
    pub failures: Vec<FileFailure>,
    pub stats: BatchStats,
    /// Set when the worker died mid-batch. Records and failures
    /// accumulated before the fault are still valid.
    pub fault: Option<String>,
}
