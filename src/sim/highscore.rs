/// Local high-score table.
///
/// Top 10 scores, sorted descending, stored as TOML next to the log file
/// (see `config::data_dir`). Equal scores rank below the ones already on
/// the board. A missing or unreadable file just means an empty table.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::Result;

pub const MAX_HIGH_SCORES: usize = 10;
pub const SCORES_FILE: &str = "highscores.toml";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u32,
    pub ships_destroyed: u32,
    pub difficulty: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScores {
    #[serde(default)]
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        HighScores { entries: Vec::new() }
    }

    pub fn default_path() -> PathBuf {
        config::data_dir().join(SCORES_FILE)
    }

    /// Would `score` make the board?
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert an entry. Returns its 1-based rank, or None if it didn't make
    /// the board.
    pub fn add_score(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        let pos = self.entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from `path`. Never fails: problems are logged and an empty
    /// table is returned.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no high scores at {}, starting fresh", path.display());
                return Self::new();
            }
            Err(e) => {
                log::warn!("could not read {}: {e}", path.display());
                return Self::new();
            }
        };

        match toml::from_str::<HighScores>(&text) {
            Ok(mut scores) => {
                scores.entries.sort_by(|a, b| b.score.cmp(&a.score));
                scores.entries.truncate(MAX_HIGH_SCORES);
                log::info!("loaded {} high scores", scores.entries.len());
                scores
            }
            Err(e) => {
                log::warn!("{} is corrupt ({e}), starting fresh", path.display());
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = toml::to_string(self)?;
        std::fs::write(path, text)?;
        log::info!("high scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}
