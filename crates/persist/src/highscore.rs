//! Key-value best-score file.
//!
//! The file is a flat JSON object of string keys to string values, e.g.
//! `{"fruitRunnerHighScore": "1250"}`. Unknown keys are preserved.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Key under which the best score is stored.
pub const HIGH_SCORE_KEY: &str = "fruitRunnerHighScore";

#[derive(Debug, thiserror::Error)]
pub enum HighScoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// File-backed best score.
#[derive(Debug)]
pub struct HighScoreStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl HighScoreStore {
    /// Open the store. A missing file is an empty store; an unreadable
    /// document is logged and treated as empty so a bad file never blocks play.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HighScoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "ignoring unreadable high score file"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best score so far. Missing or non-numeric values read as 0.
    pub fn best(&self) -> u64 {
        self.entries
            .get(HIGH_SCORE_KEY)
            .map(|v| parse_leading_digits(v))
            .unwrap_or(0)
    }

    /// Record a finished run. Persists and returns `true` only for a new best.
    pub fn record(&mut self, score: u64) -> Result<bool, HighScoreError> {
        if score <= self.best() {
            return Ok(false);
        }
        self.entries.insert(HIGH_SCORE_KEY.to_string(), score.to_string());
        self.save()?;
        tracing::info!(score, "new high score");
        Ok(true)
    }

    /// Forget the best score.
    pub fn reset(&mut self) -> Result<(), HighScoreError> {
        if self.entries.remove(HIGH_SCORE_KEY).is_some() {
            self.save()?;
        }
        Ok(())
    }

    fn save(&self) -> Result<(), HighScoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        serde_json::to_writer_pretty(std::fs::File::create(&self.path)?, &self.entries)?;
        Ok(())
    }
}

/// Integer prefix of `s` after leading whitespace, saturating; 0 if none.
fn parse_leading_digits(s: &str) -> u64 {
    s.trim_start()
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(d as u64))
}
