use crate::models::{BatchOutcome, BatchStats, FileFailure, ProgressEvent};
use chrono::Utc;
use parser::{MatchLogParser, MatchRecord, ParseWarning};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task;
use tracing::{error, info, warn};

/// One file's result crossing from the blocking worker to the async
/// accumulator.
enum WorkerMessage {
    Parsed {
        file: String,
        records: Vec<MatchRecord>,
        warnings: Vec<ParseWarning>,
        percent: u8,
    },
    Failed {
        failure: FileFailure,
        percent: u8,
    },
}

/// Parses all discovered log files sequentially on a dedicated blocking
/// task, so the caller stays responsive. Per-file parse failures are
/// captured and the batch continues; only an unexpected worker fault
/// ends it early, and results accumulated before the fault are still
/// delivered.
///
/// A `ProgressEvent` is sent after every file, in file order. Dropping
/// the receiver does not disturb the batch.
pub async fn process_logs(
    paths: Vec<PathBuf>,
    progress: mpsc::UnboundedSender<ProgressEvent>,
) -> BatchOutcome {
    let started_at = Utc::now();
    let files_found = paths.len();

    let (tx, mut rx) = mpsc::unbounded_channel();

    let worker = task::spawn_blocking(move || {
        let total = paths.len();

        for (index, path) in paths.iter().enumerate() {
            let file = path.display().to_string();
            let percent = ((index + 1) * 100 / total) as u8;

            let message = match MatchLogParser.parse_file(path) {
                Ok(output) => WorkerMessage::Parsed {
                    file,
                    records: output.records,
                    warnings: output.warnings,
                    percent,
                },
                Err(err) => WorkerMessage::Failed {
                    failure: FileFailure {
                        file,
                        description: err.to_string(),
                    },
                    percent,
                },
            };

            if tx.send(message).is_err() {
                break;
            }
        }
    });

    let mut records = Vec::new();
    let mut warnings = Vec::new();
    let mut failures = Vec::new();
    let mut files_processed = 0;
    let mut unfinished_matches = 0;

    while let Some(message) = rx.recv().await {
        match message {
            WorkerMessage::Parsed {
                file,
                records: file_records,
                warnings: file_warnings,
                percent,
            } => {
                files_processed += 1;
                unfinished_matches += file_records.iter().filter(|r| !r.finished).count();
                records.extend(file_records);
                warnings.extend(file_warnings);
                let _ = progress.send(ProgressEvent { percent, file });
            }
            WorkerMessage::Failed { failure, percent } => {
                warn!("Ignoring {}: {}", failure.file, failure.description);
                let file = failure.file.clone();
                failures.push(failure);
                let _ = progress.send(ProgressEvent { percent, file });
            }
        }
    }

    let fault = match worker.await {
        Ok(()) => None,
        Err(err) => {
            error!("Log processing worker died: {}", err);
            Some(err.to_string())
        }
    };

    let stats = BatchStats {
        files_found,
        files_processed,
        server_matches: records.len(),
        unfinished_matches,
        started_at,
        finished_at: Utc::now(),
    };

    info!(
        "Batch finished: {} matches from {}/{} files, {} failures",
        stats.server_matches, stats.files_processed, stats.files_found, failures.len()
    );

    BatchOutcome {
        records,
        warnings,
        failures,
        stats,
        fault,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    const CLEAN_LOG: &str = "\
[0000.00] Log: Log file open, 12/24/09 14:21:27
[0000.12] Init: This is Hostile Worlds version 139
[0007.43] ScriptLog: SERVER: New match started.
[0008.01] ScriptLog: SERVER: Player Zoidberg
[0008.02] ScriptLog: SERVER: Player Leela
[0900.00] ScriptLog: SERVER: Match time 600
[0900.00] ScriptLog: SERVER: Winner Leela
[0900.02] ScriptLog: SERVER: Match ended.
[0910.00] ScriptLog: SERVER: New match started.
[0911.01] ScriptLog: SERVER: Player Fry
";

    const DUPLICATE_PLAYER_LOG: &str = "\
[0007.43] ScriptLog: SERVER: New match started.
[0008.01] ScriptLog: SERVER: Player Bender
[0008.02] ScriptLog: SERVER: Player Bender
";

    fn write_log(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_batch_isolates_per_file_failures() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_log(dir.path(), "match1.log", CLEAN_LOG),
            write_log(dir.path(), "match2.log", DUPLICATE_PLAYER_LOG),
        ];

        let (tx, mut rx) = mpsc::unbounded_channel();
        let outcome = process_logs(paths, tx).await;

        assert!(outcome.fault.is_none());
        assert_eq!(outcome.stats.files_found, 2);
        assert_eq!(outcome.stats.files_processed, 1);
        assert_eq!(outcome.stats.server_matches, 2);
        assert_eq!(outcome.stats.unfinished_matches, 1);
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].file.ends_with("match2.log"));

        let shown = crate::summary::filter_matches(&outcome.records, false);
        assert_eq!(shown.len(), 1);

        // progress after every file, non-decreasing, ending at 100
        let mut percents = Vec::new();
        while let Ok(event) = rx.try_recv() {
            percents.push(event.percent);
        }
        assert_eq!(percents, vec![50, 100]);
    }

    #[tokio::test]
    async fn test_batch_preserves_scan_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_log(dir.path(), "b.log", CLEAN_LOG),
            write_log(dir.path(), "a.log", CLEAN_LOG),
        ];

        let (tx, mut rx) = mpsc::unbounded_channel();
        let outcome = process_logs(paths, tx).await;

        assert_eq!(outcome.stats.server_matches, 4);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(first.file.ends_with("b.log"));
        assert!(second.file.ends_with("a.log"));
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let outcome = process_logs(Vec::new(), tx).await;

        assert!(outcome.records.is_empty());
        assert!(outcome.fault.is_none());
        assert_eq!(outcome.stats.files_found, 0);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_file_is_a_file_failure() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.log");

        let (tx, _rx) = mpsc::unbounded_channel();
        let outcome = process_logs(vec![missing], tx).await;

        assert!(outcome.fault.is_none());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.stats.files_processed, 0);
    }
}
