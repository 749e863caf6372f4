//! # History Store
//!
//! An in-memory, append-only list of question/answer records backed by a JSON
//! file. Only the most recent [`HISTORY_CAP`] records are kept or written.

use super::{atomic_write, remove_if_exists};
use crate::{constants::HISTORY_CAP, errors::HistoryError, types::HistoryRecord};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    records: Vec<HistoryRecord>,
}

impl HistoryStore {
    /// Creates an empty store without touching the file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
        }
    }

    /// Loads the records persisted at `path`.
    ///
    /// A missing file, an unreadable file, or a file that does not parse all
    /// yield an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<Vec<HistoryRecord>>(&raw).unwrap_or_else(|e| {
                warn!(path = %path.display(), "Discarding unparseable chat history: {e}");
                Vec::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), "Failed to read chat history: {e}");
                Vec::new()
            }
        };
        debug!(path = %path.display(), count = records.len(), "Loaded chat history.");
        Self { path, records }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a record, dropping the oldest ones beyond [`HISTORY_CAP`].
    pub fn append(&mut self, question: &str, answer: &str, at: DateTime<Local>) {
        self.records.push(HistoryRecord::new(question, answer, at));
        let excess = self.records.len().saturating_sub(HISTORY_CAP);
        self.records.drain(..excess);
    }

    /// Overwrites the file with the last [`HISTORY_CAP`] records.
    pub fn save(&self) -> Result<(), HistoryError> {
        let start = self.records.len().saturating_sub(HISTORY_CAP);
        let body = serde_json::to_vec(&self.records[start..])?;
        atomic_write(&self.path, &body).map_err(|source| HistoryError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Removes the file and clears the in-memory records.
    pub fn delete(&mut self) -> Result<(), HistoryError> {
        remove_if_exists(&self.path).map_err(|source| HistoryError::Delete {
            path: self.path.clone(),
            source,
        })?;
        self.records.clear();
        Ok(())
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The last `n` records, newest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter().rev().take(n)
    }
}
