//! Best-score persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

/// Somewhere to keep one integer between runs.
pub trait ScoreStore {
    /// The stored best, or 0 when nothing usable is stored.
    fn load(&self) -> u32;
    fn save(&mut self, score: u32) -> io::Result<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct HighScoreFile {
    highscore: u32,
}

/// `{"highscore": N}` in a JSON file.
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    path: PathBuf,
}

impl JsonScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonScoreStore {
    fn load(&self) -> u32 {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!("could not read {}: {e}", self.path.display());
                return 0;
            }
        };
        match serde_json::from_str::<HighScoreFile>(&json) {
            Ok(file) => file.highscore,
            Err(e) => {
                warn!("ignoring malformed {}: {e}", self.path.display());
                0
            }
        }
    }

    fn save(&mut self, score: u32) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(&HighScoreFile { highscore: score })
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json)
    }
}

/// Keeps the score in memory only.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    pub value: u32,
    /// Number of successful saves.
    pub saves: usize,
}

impl MemoryScoreStore {
    pub fn new(value: u32) -> Self {
        Self { value, saves: 0 }
    }
}

impl ScoreStore for MemoryScoreStore {
    fn load(&self) -> u32 {
        self.value
    }

    fn save(&mut self, score: u32) -> io::Result<()> {
        self.value = score;
        self.saves += 1;
        Ok(())
    }
}
