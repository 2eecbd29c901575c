use crate::vocabulary;
use serde::Serialize;
use std::collections::HashMap;

/// Detailed information on a single Hostile Worlds match, reconstructed
/// from the marker lines of a server log file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchRecord {
    /// Date and time of the log file describing the match, verbatim.
    pub date_time: String,
    /// Hostile Worlds version the match has been played with, verbatim.
    pub version: String,
    /// Map the match has been played on.
    pub map: String,
    /// Player lineup of the match (e.g. 1v1).
    pub format: String,
    /// Participating players, in order of appearance in the log.
    pub players: Vec<String>,
    /// Length of the match, in seconds.
    pub match_time: u32,
    /// Name of the player that has won the match.
    pub winner: String,
    /// Whether the match has been properly finished.
    pub finished: bool,
    /// Squad members called during the match, per player and class.
    pub squad_composition: HashMap<String, HashMap<String, u32>>,
    /// Abilities used during the match, per player and ability.
    pub ability_distribution: HashMap<String, HashMap<String, u32>>,
    /// Total actions performed, per player. Absent until reported.
    pub actions: HashMap<String, u32>,
}

impl MatchRecord {
    /// Adds a player to the match, seeding zeroed squad and ability
    /// counters for the full vocabulary. Usage markers only ever
    /// increment these preexisting zeros, never insert new keys.
    pub fn register_player(&mut self, name: &str) -> Result<(), ParseError> {
        if self.players.iter().any(|player| player == name) {
            return Err(ParseError::DuplicatePlayer(name.to_string()));
        }

        self.players.push(name.to_string());
        self.squad_composition
            .insert(name.to_string(), vocabulary::zeroed_squad_counts());
        self.ability_distribution
            .insert(name.to_string(), vocabulary::zeroed_ability_counts());

        Ok(())
    }

    /// Actions per minute for the given player, truncating division.
    /// `None` when the match length is zero or no action count was
    /// reported for the player.
    pub fn actions_per_minute(&self, player: &str) -> Option<u64> {
        if self.match_time == 0 {
            return None;
        }
        let actions = *self.actions.get(player)?;
        Some(actions as u64 * 60 / self.match_time as u64)
    }
}

/// Everything extracted from one log file: the matches found plus any
/// recoverable anomalies encountered along the way.
#[derive(Debug, Default)]
pub struct ParseOutput {
    pub records: Vec<MatchRecord>,
    pub warnings: Vec<ParseWarning>,
}

/// A recoverable anomaly in one log file. The affected counter is left
/// unchanged and parsing of the file continues.
#[derive(Debug, Clone, Serialize)]
pub struct ParseWarning {
    pub file: String,
    pub description: String,
}

impl ParseWarning {
    pub fn new(file: &str, description: impl Into<String>) -> Self {
        Self {
            file: file.to_string(),
            description: description.into(),
        }
    }
}

/// A condition fatal to one log file. All records parsed from the file
/// so far are discarded; the batch continues with the next file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("matches with two or more players having the same player name are not supported: {0}")]
    DuplicatePlayer(String),
    #[error("invalid {field} value {value:?}: {source}")]
    InvalidNumber {
        field: &'static str,
        value: String,
        source: std::num::ParseIntError,
    },
    #[error("malformed actions payload: {0:?}")]
    MalformedActions(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::{ABILITIES, SQUAD_MEMBER_CLASSES};

    #[test]
    fn test_register_player_seeds_zeroed_counters() {
        let mut record = MatchRecord::default();
        record.register_player("Zoidberg").unwrap();

        assert_eq!(record.players, vec!["Zoidberg"]);

        let squads = &record.squad_composition["Zoidberg"];
        assert_eq!(squads.len(), SQUAD_MEMBER_CLASSES.len());
        assert!(squads.values().all(|count| *count == 0));

        let abilities = &record.ability_distribution["Zoidberg"];
        assert_eq!(abilities.len(), ABILITIES.len());
        assert!(abilities.values().all(|count| *count == 0));
    }

    #[test]
    fn test_register_player_rejects_duplicate() {
        let mut record = MatchRecord::default();
        record.register_player("Zoidberg").unwrap();

        let err = record.register_player("Zoidberg").unwrap_err();
        assert!(matches!(err, ParseError::DuplicatePlayer(name) if name == "Zoidberg"));
    }

    #[test]
    fn test_actions_per_minute_truncates() {
        let mut record = MatchRecord::default();
        record.register_player("Leela").unwrap();
        record.match_time = 600;
        record.actions.insert("Leela".to_string(), 120);

        assert_eq!(record.actions_per_minute("Leela"), Some(12));

        record.actions.insert("Leela".to_string(), 121);
        assert_eq!(record.actions_per_minute("Leela"), Some(12));
    }

    #[test]
    fn test_actions_per_minute_guards() {
        let mut record = MatchRecord::default();
        record.register_player("Leela").unwrap();
        record.actions.insert("Leela".to_string(), 120);

        // zero-length match
        assert_eq!(record.actions_per_minute("Leela"), None);

        // no action count reported
        record.match_time = 600;
        assert_eq!(record.actions_per_minute("Fry"), None);
    }
}
