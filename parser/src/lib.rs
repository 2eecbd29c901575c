// Parser crate for Hostile Worlds server log files

pub mod match_parser;
pub mod scanner;
pub mod types;
pub mod vocabulary;

// Re-export main types
pub use match_parser::MatchLogParser;
pub use scanner::{scan_directory, ScanError, ScanOutcome, LOG_FILE_MARKER};
pub use types::{MatchRecord, ParseError, ParseOutput, ParseWarning};
