// src/memory/mod.rs

//! Append-only interaction log.
//!
//! One JSON object per line, one line per run that reached execution:
//!
//! ```text
//! {"prompt":"list files","executed_plan":[{"command":"ls -l","explanation":"...","result":{...}}]}
//! ```

use crate::protocol::InteractionLogEntry;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

/// Sink for finished runs. Entries are never rewritten.
pub trait InteractionLog {
    fn append(&mut self, entry: &InteractionLogEntry) -> Result<()>;
}

/// Newline-delimited JSON file.
pub struct JsonlLog {
    path: PathBuf,
}

impl JsonlLog {
    /// Opens the log at `path`, creating parent directories if needed.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every entry back in the order written. Missing file means no entries.
    pub fn load_all(&self) -> Result<Vec<InteractionLogEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let reader = io::BufReader::new(fs::File::open(&self.path)?);
        let mut entries = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                entries.push(serde_json::from_str(&line)?);
            }
        }
        Ok(entries)
    }
}

impl InteractionLog for JsonlLog {
    fn append(&mut self, entry: &InteractionLogEntry) -> Result<()> {
        debug!(path = %self.path.display(), steps = entry.executed_plan.len(), "append: called");
        let mut file = fs::OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

/// In-memory implementation, for embedding and tests.
#[derive(Default, Debug)]
pub struct InMemoryLog {
    pub entries: Vec<InteractionLogEntry>,
}

impl InMemoryLog {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }
}

impl InteractionLog for InMemoryLog {
    fn append(&mut self, entry: &InteractionLogEntry) -> Result<()> {
        self.entries.push(entry.clone());
        Ok(())
    }
}
