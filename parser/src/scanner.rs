use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Substring that log file names contain. Deliberately not a suffix
/// match: rotated names like `server.log.1` still qualify.
pub const LOG_FILE_MARKER: &str = ".log";

/// A directory or entry that could not be read during the scan. The
/// traversal continues past it.
#[derive(Debug, Clone)]
pub struct ScanError {
    pub path: PathBuf,
    pub description: String,
}

/// Result of one recursive directory scan.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Candidate log files, in depth-first walk order.
    pub files: Vec<PathBuf>,
    /// Inaccessible entries encountered along the way.
    pub errors: Vec<ScanError>,
}

/// Recursively scans `root` for Hostile Worlds log files. Unreadable
/// subdirectories are reported and skipped rather than aborting the
/// whole traversal.
pub fn scan_directory(root: &Path) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    for entry in WalkDir::new(root) {
        match entry {
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    continue;
                }
                let Some(name) = entry.file_name().to_str() else {
                    continue;
                };
                if name.contains(LOG_FILE_MARKER) {
                    outcome.files.push(entry.into_path());
                }
            }
            Err(err) => {
                let path = err.path().unwrap_or(root).to_path_buf();
                warn!("Unable to read {}: {}", path.display(), err);
                outcome.errors.push(ScanError {
                    path,
                    description: err.to_string(),
                });
            }
        }
    }

    info!(
        "Found {} log files under {}",
        outcome.files.len(),
        root.display()
    );

    outcome
}
