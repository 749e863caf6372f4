//! # Admin Actions
//!
//! Knowledge curation and history review, gated per session by a shared
//! password. Every action other than [`AdminGate::unlock`] fails with
//! [`AdminError::Locked`] until the session has been unlocked.

use crate::{
    constants::{
        KNOWLEDGE_PREVIEW_CHARS, RECENT_QUESTIONS_LIMIT, RECENT_QUESTION_PREVIEW_CHARS,
    },
    conversation::SessionContext,
    errors::AdminError,
    store::knowledge::{truncate_chars, KnowledgeStore},
};
use serde::Serialize;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{info, warn};

/// One line of the "recent questions" view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentQuestion {
    /// `Q1` for the newest question, counting up.
    pub label: String,
    pub question: String,
    /// Local time as `07:45 PM, Mar 03`.
    pub asked_at: String,
}

/// The current knowledge blob: a short preview for display and the full text
/// for editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KnowledgePreview {
    pub preview: String,
    pub content: String,
    pub characters: usize,
}

type HmacSha256 = Hmac<Sha256>;

/// The message authenticated with the password as key.
const UNLOCK_CONTEXT: &[u8] = b"carebot-admin-unlock";

/// Holds a tag derived from the configured admin password.
#[derive(Clone, Default)]
pub struct AdminGate {
    password_tag: Option<Vec<u8>>,
}

impl std::fmt::Debug for AdminGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminGate")
            .field("configured", &self.password_tag.is_some())
            .finish()
    }
}

fn keyed_mac(secret: &str) -> Option<HmacSha256> {
    HmacSha256::new_from_slice(secret.as_bytes())
        .ok()
        .map(|mac| mac.chain_update(UNLOCK_CONTEXT))
}

impl AdminGate {
    /// A gate for `password`. An empty or missing password disables admin
    /// access entirely.
    pub fn new(password: Option<&str>) -> Self {
        Self {
            password_tag: password
                .filter(|p| !p.is_empty())
                .and_then(keyed_mac)
                .map(|mac| mac.finalize().into_bytes().to_vec()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.password_tag.is_some()
    }

    /// Unlocks `session` if `candidate` matches the configured password.
    pub fn unlock(&self, session: &mut SessionContext, candidate: &str) -> bool {
        let Some(expected) = &self.password_tag else {
            warn!("Admin unlock attempted but no admin password is configured.");
            return false;
        };
        // `verify_slice` compares in constant time.
        let matched = keyed_mac(candidate)
            .map(|mac| mac.verify_slice(expected).is_ok())
            .unwrap_or(false);
        if matched {
            session.admin_unlocked = true;
            info!("Admin unlocked for session.");
        } else {
            warn!("Admin unlock rejected: wrong password.");
        }
        matched
    }

    /// Fails with [`AdminError::Locked`] unless `session` has been unlocked.
    pub fn require_unlocked(session: &SessionContext) -> Result<(), AdminError> {
        if session.admin_unlocked {
            Ok(())
        } else {
            Err(AdminError::Locked)
        }
    }

    /// Saves new knowledge. `Ok(None)` means the merged text was blank and the
    /// previous blob was kept.
    pub fn save_knowledge(
        &self,
        session: &SessionContext,
        store: &KnowledgeStore,
        pdf_texts: &[String],
        manual_text: &str,
    ) -> Result<Option<String>, AdminError> {
        Self::require_unlocked(session)?;
        Ok(store.save(pdf_texts, manual_text)?)
    }

    pub fn delete_knowledge(
        &self,
        session: &SessionContext,
        store: &KnowledgeStore,
    ) -> Result<(), AdminError> {
        Self::require_unlocked(session)?;
        Ok(store.delete()?)
    }

    pub fn knowledge_preview(
        &self,
        session: &SessionContext,
        store: &KnowledgeStore,
    ) -> Result<KnowledgePreview, AdminError> {
        Self::require_unlocked(session)?;
        let blob = store.load();
        Ok(KnowledgePreview {
            preview: truncate_chars(&blob, KNOWLEDGE_PREVIEW_CHARS),
            characters: blob.chars().count(),
            content: blob,
        })
    }

    /// Deletes the history file and clears this session's in-memory history.
    pub fn delete_history(&self, session: &mut SessionContext) -> Result<(), AdminError> {
        Self::require_unlocked(session)?;
        session.history.delete()?;
        info!("Chat history deleted.");
        Ok(())
    }

    /// The last ten questions of the session's history, newest first.
    pub fn recent_questions(
        &self,
        session: &SessionContext,
    ) -> Result<Vec<RecentQuestion>, AdminError> {
        Self::require_unlocked(session)?;
        Ok(session
            .history
            .recent(RECENT_QUESTIONS_LIMIT)
            .enumerate()
            .map(|(i, record)| RecentQuestion {
                label: format!("Q{}", i + 1),
                question: elide(record.question(), RECENT_QUESTION_PREVIEW_CHARS),
                asked_at: record.timestamp().format("%I:%M %p, %b %d").to_string(),
            })
            .collect())
    }
}

fn elide(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", truncate_chars(text, max))
    } else {
        text.to_string()
    }
}
