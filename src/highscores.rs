//! High score leaderboard.
//!
//! The simulation only needs to ask whether a score would place and to record it. Storage is a
//! collaborator's concern: [`Leaderboard`] keeps entries in memory and can be loaded from or
//! written to the plain `name score` text format, one entry per line.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::constants::leaderboard::{DEFAULT_NAME, MAX_ENTRIES, MAX_NAME_LENGTH};
use crate::error::ScoreEntryError;

/// A single leaderboard entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    /// Names are trimmed, stripped of inner whitespace and capped in length.
    pub fn new(name: &str, score: u32) -> Self {
        let name: String = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .take(MAX_NAME_LENGTH)
            .collect();

        Self {
            name: if name.is_empty() { DEFAULT_NAME.to_string() } else { name },
            score,
        }
    }
}

impl FromStr for ScoreEntry {
    type Err = ScoreEntryError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (Some(name), Some(score), None) => Ok(ScoreEntry::new(name, score.parse()?)),
            _ => Err(ScoreEntryError::Malformed(line.to_string())),
        }
    }
}

impl fmt::Display for ScoreEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.score)
    }
}

/// The operations the game needs from a score store.
///
/// Implementations absorb their own storage failures and report them as an empty leaderboard.
pub trait ScoreStore {
    /// The best `k` entries, highest first.
    fn top(&self, k: usize) -> Vec<ScoreEntry>;

    /// Whether `score` would currently earn a place.
    fn is_high_score(&self, score: u32) -> bool;

    /// Records a score. Returns the 1-based rank achieved, if it placed.
    fn record(&mut self, name: &str, score: u32) -> Option<usize>;
}

/// In-memory top-five leaderboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads entries from `name score` lines. Malformed lines are skipped with a warning.
    pub fn parse(text: &str) -> Self {
        let mut board = Self::new();
        for (number, line) in text.lines().enumerate().filter(|(_, line)| !line.trim().is_empty()) {
            match line.parse::<ScoreEntry>() {
                Ok(entry) => {
                    board.insert(entry);
                }
                Err(error) => warn!(line = number + 1, %error, "Skipping leaderboard line"),
            }
        }
        board
    }

    /// Entries in rank order.
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts below any existing entries with the same score, then trims to capacity.
    fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        let index = self
            .entries
            .iter()
            .position(|existing| entry.score > existing.score)
            .unwrap_or(self.entries.len());
        if index >= MAX_ENTRIES {
            return None;
        }

        self.entries.insert(index, entry);
        self.entries.truncate(MAX_ENTRIES);
        Some(index + 1)
    }
}

impl ScoreStore for Leaderboard {
    fn top(&self, k: usize) -> Vec<ScoreEntry> {
        self.entries.iter().take(k).cloned().collect()
    }

    fn is_high_score(&self, score: u32) -> bool {
        self.entries.len() < MAX_ENTRIES || self.entries.last().is_some_and(|lowest| score > lowest.score)
    }

    fn record(&mut self, name: &str, score: u32) -> Option<usize> {
        if !self.is_high_score(score) {
            return None;
        }
        self.insert(ScoreEntry::new(name, score))
    }
}

/// Writes the board in the `name score` line format.
impl fmt::Display for Leaderboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}
