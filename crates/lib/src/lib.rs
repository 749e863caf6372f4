//! # carebot
//!
//! Core library for a hospital-support chat assistant. It keeps a small,
//! admin-curated knowledge blob on disk, injects it into every prompt sent to an
//! OpenAI-compatible chat-completion API, rewrites doctor schedule tables in the
//! reply into plain labelled entries, and records each question/answer pair in a
//! capped history file.
//!
//! The HTTP surface lives in `carebot-server`; PDF text extraction lives in
//! `carebot-pdf` as a [`ingest::DocumentExtractor`] plugin.

pub mod admin;
pub mod constants;
pub mod conversation;
pub mod errors;
pub mod format;
pub mod ingest;
pub mod prompts;
pub mod providers;
pub mod store;
pub mod types;

pub use admin::{AdminGate, KnowledgePreview, RecentQuestion};
pub use conversation::{pick_fallback, Conversation, SessionContext, TurnOutcome};
pub use errors::{AdminError, ChatError, DocumentExtractionError, HistoryError, KnowledgeError};
pub use format::schedule::{format_doctor_schedule, DoctorEntry};
pub use prompts::{build_prompt, PromptPayload};
pub use providers::ai::{ChatProvider, OpenRouterProvider};
pub use store::{history::HistoryStore, knowledge::KnowledgeStore};
pub use types::{ChatMessage, HistoryRecord, Message, ReplySource, Role};
