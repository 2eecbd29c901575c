use crate::{MatchRecord, ParseError, ParseOutput, ParseWarning};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

// Marker substrings identifying the semantic category of a log line.
// Lines carry an engine prefix (e.g. "[0007.43] ScriptLog: "), so the
// payload is taken after the *last* occurrence of the marker.
const MARKER_DATE_TIME: &str = "Log file open, ";
const MARKER_VERSION: &str = "This is Hostile Worlds version ";
const MARKER_NEW_MATCH: &str = "SERVER: New match started.";
const MARKER_MAP: &str = "SERVER: Map ";
const MARKER_FORMAT: &str = "SERVER: Format ";
const MARKER_PLAYER: &str = "SERVER: Player ";
const MARKER_MATCH_TIME: &str = "SERVER: Match time ";
const MARKER_WINNER: &str = "SERVER: Winner ";
const MARKER_MATCH_ENDED: &str = "SERVER: Match ended.";
const MARKER_SQUAD_MEMBER_CALLED: &str = "SERVER: Squad Member ";
const MARKER_CALLED_BY: &str = "called by ";
const MARKER_ABILITY_USED: &str = "SERVER: Ability ";
const MARKER_USED_BY: &str = "used by ";
const MARKER_ACTIONS: &str = "SERVER: Actions ";

/// Extracts Hostile Worlds match records from server log files.
///
/// A single forward pass tests every line against the markers above in a
/// fixed priority order; a line matches at most one marker. The most
/// recently seen date/time and version strings survive across match
/// boundaries and stamp each new record.
pub struct MatchLogParser;

impl MatchLogParser {
    /// Opens and parses one log file. The file handle is dropped before
    /// this returns, so no handle outlives one parse call.
    pub fn parse_file(&self, path: &Path) -> Result<ParseOutput, ParseError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        self.parse(reader, &path.display().to_string())
    }

    /// Parses all match logs from the given line source. `file` is only
    /// used to label warnings.
    pub fn parse<R: BufRead>(&self, reader: R, file: &str) -> Result<ParseOutput, ParseError> {
        let mut records: Vec<MatchRecord> = Vec::new();
        let mut warnings: Vec<ParseWarning> = Vec::new();

        // Emitted once per file, before any match starts; carried into
        // every record created afterwards.
        let mut date_time = String::new();
        let mut version = String::new();

        for line in reader.lines() {
            let line = line?;

            if let Some(payload) = payload_after_last(&line, MARKER_DATE_TIME) {
                date_time = payload.to_string();
            } else if let Some(payload) = payload_after_last(&line, MARKER_VERSION) {
                version = payload.to_string();
            } else if line.contains(MARKER_NEW_MATCH) {
                debug!("New match block in {}", file);
                records.push(MatchRecord {
                    date_time: date_time.clone(),
                    version: version.clone(),
                    ..MatchRecord::default()
                });
            } else if let Some(payload) = payload_after_last(&line, MARKER_MAP) {
                match records.last_mut() {
                    Some(record) => record.map = payload.to_string(),
                    None => warnings.push(orphan_warning(file, &line)),
                }
            } else if let Some(payload) = payload_after_last(&line, MARKER_FORMAT) {
                match records.last_mut() {
                    Some(record) => record.format = payload.to_string(),
                    None => warnings.push(orphan_warning(file, &line)),
                }
            } else if let Some(payload) = payload_after_last(&line, MARKER_PLAYER) {
                match records.last_mut() {
                    Some(record) => record.register_player(payload)?,
                    None => warnings.push(orphan_warning(file, &line)),
                }
            } else if let Some(payload) = payload_after_last(&line, MARKER_MATCH_TIME) {
                match records.last_mut() {
                    Some(record) => record.match_time = parse_number("match time", payload)?,
                    None => warnings.push(orphan_warning(file, &line)),
                }
            } else if let Some(payload) = payload_after_last(&line, MARKER_WINNER) {
                match records.last_mut() {
                    Some(record) => record.winner = payload.to_string(),
                    None => warnings.push(orphan_warning(file, &line)),
                }
            } else if line.contains(MARKER_MATCH_ENDED) {
                match records.last_mut() {
                    Some(record) => record.finished = true,
                    None => warnings.push(orphan_warning(file, &line)),
                }
            } else if let Some(payload) = payload_after_last(&line, MARKER_SQUAD_MEMBER_CALLED) {
                match records.last_mut() {
                    Some(record) => record_usage(
                        &mut record.squad_composition,
                        payload,
                        &line,
                        MARKER_CALLED_BY,
                        "squad member class",
                        file,
                        &mut warnings,
                    ),
                    None => warnings.push(orphan_warning(file, &line)),
                }
            } else if let Some(payload) = payload_after_last(&line, MARKER_ABILITY_USED) {
                match records.last_mut() {
                    Some(record) => record_usage(
                        &mut record.ability_distribution,
                        payload,
                        &line,
                        MARKER_USED_BY,
                        "ability",
                        file,
                        &mut warnings,
                    ),
                    None => warnings.push(orphan_warning(file, &line)),
                }
            } else if let Some(payload) = payload_after_last(&line, MARKER_ACTIONS) {
                match records.last_mut() {
                    Some(record) => record_actions(record, payload, file, &mut warnings)?,
                    None => warnings.push(orphan_warning(file, &line)),
                }
            }
        }

        debug!(
            "Parsed {} matches from {} with {} warnings",
            records.len(),
            file,
            warnings.len()
        );

        Ok(ParseOutput { records, warnings })
    }
}

/// Everything after the last occurrence of `marker` on the line, or
/// `None` if the line does not contain the marker.
fn payload_after_last<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    line.rfind(marker).map(|index| &line[index + marker.len()..])
}

fn parse_number(field: &'static str, payload: &str) -> Result<u32, ParseError> {
    payload
        .trim()
        .parse()
        .map_err(|source| ParseError::InvalidNumber {
            field,
            value: payload.to_string(),
            source,
        })
}

fn orphan_warning(file: &str, line: &str) -> ParseWarning {
    ParseWarning::new(file, format!("marker line before any match started: {line:?}"))
}

/// Handles the two-part squad-member-called / ability-used lines: the
/// called/used name sits in quotes right after the marker, the actor
/// follows the `called by ` / `used by ` infix later on the same line.
/// Unknown names and unknown actors leave all counters unchanged.
fn record_usage(
    counters: &mut std::collections::HashMap<String, std::collections::HashMap<String, u32>>,
    payload: &str,
    line: &str,
    actor_marker: &str,
    kind: &str,
    file: &str,
    warnings: &mut Vec<ParseWarning>,
) {
    let Some(name) = quoted_name(payload) else {
        warnings.push(ParseWarning::new(
            file,
            format!("missing quoted {kind} name: {line:?}"),
        ));
        return;
    };

    let Some(actor) = payload_after_last(line, actor_marker) else {
        warnings.push(ParseWarning::new(
            file,
            format!("missing {actor_marker:?} on {kind} line: {line:?}"),
        ));
        return;
    };

    match counters.get_mut(actor) {
        Some(counts) => match counts.get_mut(name) {
            Some(count) => *count += 1,
            None => warnings.push(ParseWarning::new(
                file,
                format!("{actor} has used unknown {kind} {name}"),
            )),
        },
        None => warnings.push(ParseWarning::new(
            file,
            format!("unknown player {actor} on {kind} line"),
        )),
    }
}

/// `SERVER: Actions <player> <count>`; the count overwrites any earlier
/// value for the player.
fn record_actions(
    record: &mut MatchRecord,
    payload: &str,
    file: &str,
    warnings: &mut Vec<ParseWarning>,
) -> Result<(), ParseError> {
    let mut parts = payload.split_whitespace();
    let (Some(player), Some(count)) = (parts.next(), parts.next()) else {
        return Err(ParseError::MalformedActions(payload.to_string()));
    };

    let count = parse_number("action count", count)?;

    if record.players.iter().any(|name| name == player) {
        record.actions.insert(player.to_string(), count);
    } else {
        warnings.push(ParseWarning::new(
            file,
            format!("actions reported for unknown player {player}"),
        ));
    }

    Ok(())
}

/// The name between the quote immediately following the marker and the
/// next quote character.
fn quoted_name(payload: &str) -> Option<&str> {
    payload.strip_prefix('"')?.split('"').next()
}
