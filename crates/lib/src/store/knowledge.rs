//! # Knowledge Store
//!
//! Holds the single knowledge blob injected into every prompt. The blob is
//! stored verbatim in a UTF-8 text file with no envelope.

use super::{atomic_write, remove_if_exists};
use crate::{constants::MAX_KNOWLEDGE_CHARS, errors::KnowledgeError};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct KnowledgeStore {
    path: PathBuf,
}

impl KnowledgeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current blob. A missing or unreadable file yields empty text.
    pub fn load(&self) -> String {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                warn!(path = %self.path.display(), "Failed to read knowledge file, using empty knowledge: {e}");
                String::new()
            }
        }
    }

    /// Merges the extracted document texts with the manual text, truncates the
    /// result, and writes it if it holds anything but whitespace.
    ///
    /// Returns `Ok(None)` when the merged text is blank; the existing file is
    /// left untouched in that case.
    pub fn save(
        &self,
        pdf_texts: &[String],
        manual_text: &str,
    ) -> Result<Option<String>, KnowledgeError> {
        let combined = merge_knowledge(pdf_texts, manual_text);
        if combined.trim().is_empty() {
            info!("Merged knowledge is blank; keeping the existing knowledge file.");
            return Ok(None);
        }

        atomic_write(&self.path, combined.as_bytes()).map_err(|source| KnowledgeError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(
            path = %self.path.display(),
            characters = combined.chars().count(),
            "Saved knowledge."
        );
        Ok(Some(combined))
    }

    /// Removes the knowledge file. Succeeds if it is already gone.
    pub fn delete(&self) -> Result<(), KnowledgeError> {
        remove_if_exists(&self.path).map_err(|source| KnowledgeError::Delete {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "Deleted knowledge file.");
        Ok(())
    }
}

/// Builds the knowledge blob from uploaded document texts and manual text.
///
/// Document texts are concatenated as-is. The trimmed manual text follows on a
/// new line when documents were supplied, or stands alone otherwise. The result
/// is cut to [`MAX_KNOWLEDGE_CHARS`] characters.
pub fn merge_knowledge(pdf_texts: &[String], manual_text: &str) -> String {
    let mut combined: String = pdf_texts.concat();
    let manual = manual_text.trim();

    if !manual.is_empty() {
        if pdf_texts.is_empty() {
            combined = manual.to_string();
        } else {
            combined.push('\n');
            combined.push_str(manual);
        }
    }

    truncate_chars(&combined, MAX_KNOWLEDGE_CHARS)
}

/// Returns the first `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
