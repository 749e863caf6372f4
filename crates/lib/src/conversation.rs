//! # Conversation Controller
//!
//! Runs one chat turn from the user's question to the stored answer. All state
//! that belongs to a visitor lives in a [`SessionContext`] the caller owns and
//! passes in, so the controller itself is shared freely between sessions.

use crate::{
    constants::{FALLBACK_MESSAGES, GREETING},
    format::schedule::{extract_doctors, format_doctor_schedule, DoctorEntry},
    prompts::build_prompt,
    providers::ai::ChatProvider,
    store::{history::HistoryStore, knowledge::KnowledgeStore},
    types::{Message, ReplySource},
};
use chrono::Local;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Per-visitor state: the message log, the admin unlock flag, and the history
/// loaded when the session began.
#[derive(Debug, Clone)]
pub struct SessionContext {
    messages: Vec<Message>,
    pub admin_unlocked: bool,
    pub history: HistoryStore,
}

impl SessionContext {
    /// Starts a session: loads the history file once and opens the message log
    /// with the assistant greeting.
    pub fn start(history_path: impl Into<PathBuf>) -> Self {
        Self::with_history(HistoryStore::load(history_path))
    }

    pub fn with_history(history: HistoryStore) -> Self {
        Self {
            messages: vec![Message::assistant(GREETING)],
            admin_unlocked: false,
            history,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    fn push(&mut self, message: Message) {
        self.messages.push(message);
    }
}

/// The result of one turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// The text appended to the message log and stored in history.
    pub reply: String,
    pub source: ReplySource,
    /// Doctor rows found in the raw model reply, for card-style rendering.
    pub doctors: Vec<DoctorEntry>,
    /// False when the history file could not be written.
    #[serde(skip)]
    pub history_saved: bool,
}

/// Chooses one of the canned fallback replies uniformly at random.
pub fn pick_fallback<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    FALLBACK_MESSAGES
        .choose(rng)
        .copied()
        .unwrap_or(FALLBACK_MESSAGES[0])
}

/// Orchestrates a turn: prompt assembly, the completion call, reply
/// formatting, and history bookkeeping.
#[derive(Debug, Clone)]
pub struct Conversation {
    provider: Arc<dyn ChatProvider>,
    knowledge: KnowledgeStore,
}

impl Conversation {
    pub fn new(provider: Arc<dyn ChatProvider>, knowledge: KnowledgeStore) -> Self {
        Self {
            provider,
            knowledge,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    /// Answers `question` within `session`.
    ///
    /// Never fails from the visitor's point of view: a provider error becomes a
    /// fallback reply, and a history write error is logged and flagged in the
    /// outcome.
    #[instrument(skip(self, session))]
    pub async fn handle_turn(&self, session: &mut SessionContext, question: &str) -> TurnOutcome {
        session.push(Message::user(question));

        let payload = build_prompt(&self.knowledge.load(), question);
        let (reply, source, doctors) = match self.provider.complete(&payload).await {
            Ok(raw) => {
                let doctors = extract_doctors(&raw);
                (format_doctor_schedule(&raw), ReplySource::Model, doctors)
            }
            Err(e) => {
                if e.is_transport() {
                    warn!("Chat provider unreachable, using fallback reply: {e}");
                } else {
                    warn!("Chat provider returned an unusable reply, using fallback: {e}");
                }
                let fallback = pick_fallback(&mut rand::thread_rng());
                (fallback.to_string(), ReplySource::Fallback, Vec::new())
            }
        };

        session.push(Message::assistant(reply.clone()));
        session.history.append(question, &reply, Local::now());
        let history_saved = match session.history.save() {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to persist chat history: {e}");
                false
            }
        };

        info!(source = ?source, doctors = doctors.len(), "Turn completed.");
        TurnOutcome {
            reply,
            source,
            doctors,
            history_saved,
        }
    }
}
