use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by a [`crate::providers::ai::ChatProvider`].
///
/// None of these reach the end user: the conversation controller swaps any of
/// them for a fallback message.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Failed to build Reqwest client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("Failed to send request to chat provider: {0}")]
    Transport(reqwest::Error),
    #[error("Chat provider returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Chat provider returned a malformed response: {0}")]
    Malformed(String),
    #[error("Chat provider returned an empty reply")]
    EmptyReply,
}

impl ChatError {
    /// True for network, timeout, and non-success status failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, ChatError::Transport(_) | ChatError::Api { .. })
    }
}

/// Errors from writing or removing the knowledge file.
///
/// Reads never fail; an unreadable file is treated as empty knowledge.
#[derive(Error, Debug)]
pub enum KnowledgeError {
    #[error("Failed to write knowledge file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to delete knowledge file '{path}': {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from writing or removing the history file.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("Failed to serialize chat history: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write history file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to delete history file '{path}': {source}")]
    Delete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A single document or page that failed to yield text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentExtractionError {
    #[error("Failed to open document '{document}': {reason}")]
    Document { document: String, reason: String },
    #[error("Failed to extract page {page} of '{document}': {reason}")]
    Page {
        document: String,
        page: u32,
        reason: String,
    },
}

/// Errors returned by the admin actions.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Admin access is locked for this session")]
    Locked,
    #[error(transparent)]
    Knowledge(#[from] KnowledgeError),
    #[error(transparent)]
    History(#[from] HistoryError),
}
