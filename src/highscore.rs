//! High-score persistence: one decimal integer in a text file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::HighScoreError;

/// Read the stored high score.
pub fn read_high_score(path: &Path) -> Result<u32, HighScoreError> {
    let content = fs::read_to_string(path).map_err(|source| HighScoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    content.trim().parse().map_err(|_| HighScoreError::Parse {
        path: path.to_path_buf(),
        content,
    })
}

/// Replace the stored high score atomically: the value is written to a
/// temporary file beside `path` and renamed over it.
pub fn write_high_score(path: &Path, value: u32) -> Result<(), HighScoreError> {
    let io_err = |source: io::Error| HighScoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    write!(tmp, "{value}").map_err(io_err)?;
    tmp.flush().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Best-effort store: read failures fall back to 0, write failures are
/// logged and skipped.
#[derive(Debug)]
pub struct HighScoreStore {
    path: PathBuf,
    best: u32,
}

impl HighScoreStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = Self::load(&path);
        let store = Self { path, best };
        tracing::debug!(path = ?store.path(), best, "high score store opened");
        store
    }

    pub fn load(path: &Path) -> u32 {
        match read_high_score(path) {
            Ok(value) => value,
            Err(HighScoreError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(?path, "no high score recorded yet");
                0
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load high score, starting from 0");
                0
            }
        }
    }

    pub fn save(&self, value: u32) {
        match write_high_score(&self.path, value) {
            Ok(()) => tracing::info!(value, "high score saved"),
            Err(e) => tracing::warn!(error = %e, "failed to save high score"),
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `score` if it beats the best so far. Returns whether it did.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        self.save(score);
        true
    }
}
