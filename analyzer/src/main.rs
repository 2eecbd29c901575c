mod batch;
mod models;
mod summary;

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Scans a directory tree for Hostile Worlds server logs and extracts
/// per-match statistics.
#[derive(Debug, Parser)]
#[command(name = "analyzer")]
struct Args {
    /// Directory to scan recursively for log files
    root: PathBuf,

    /// Also show matches that never saw a match-ended marker
    #[arg(long)]
    include_unfinished: bool,

    /// Emit the report as JSON instead of a text summary
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    matches: Vec<&'a parser::MatchRecord>,
    failures: &'a [models::FileFailure],
    stats: &'a models::BatchStats,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "analyzer=info,parser=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let scan = parser::scan_directory(&args.root);
    for err in &scan.errors {
        eprintln!("Unable to read {}: {}", err.path.display(), err.description);
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<models::ProgressEvent>();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            println!("({} %) Processing {}...", event.percent, event.file);
        }
    });

    let outcome = batch::process_logs(scan.files, tx).await;
    let _ = printer.await;

    let shown = summary::filter_matches(&outcome.records, args.include_unfinished);

    if args.json {
        let report = JsonReport {
            matches: shown,
            failures: &outcome.failures,
            stats: &outcome.stats,
        };
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
    } else {
        print!("{}", summary::render_summary(&outcome, shown.len()));
    }

    if outcome.fault.is_some() {
        std::process::exit(1);
    }
}
