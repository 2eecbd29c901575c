use crate::models::BatchOutcome;
use parser::MatchRecord;
use std::fmt::Write;

/// Filters the accumulated records for presentation, preserving the
/// order the coordinator appended them in. Unfinished matches stay in
/// the stats either way.
pub fn filter_matches(records: &[MatchRecord], include_unfinished: bool) -> Vec<&MatchRecord> {
    records
        .iter()
        .filter(|record| record.finished || include_unfinished)
        .collect()
}

/// Renders the end-of-run text summary: ignored files with reasons,
/// aggregate match counts, and elapsed time.
pub fn render_summary(outcome: &BatchOutcome, shown: usize) -> String {
    let mut text = String::new();
    let stats = &outcome.stats;

    let _ = writeln!(text, "Found {} log files.", stats.files_found);
    let _ = writeln!(
        text,
        "Ignored {} log files due to errors:",
        outcome.failures.len()
    );
    let _ = writeln!(text);
    for failure in &outcome.failures {
        let _ = writeln!(text, "[{}] {}", failure.file, failure.description);
    }
    let _ = writeln!(text);

    for warning in &outcome.warnings {
        let _ = writeln!(text, "Warning [{}] {}", warning.file, warning.description);
    }
    if !outcome.warnings.is_empty() {
        let _ = writeln!(text);
    }

    let _ = writeln!(
        text,
        "Processed server-side logs of {} matches, {} of which have not been finished: Showing {} logs.",
        stats.server_matches, stats.unfinished_matches, shown
    );
    let _ = writeln!(text, "Finished in {}.", stats.elapsed());

    if let Some(fault) = &outcome.fault {
        let _ = writeln!(text, "Batch aborted early: {fault}");
    }

    text
}
