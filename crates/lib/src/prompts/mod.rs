//! # Prompt Assembly
//!
//! Builds the two-message payload (system + user) sent for each chat turn.

pub mod core;

use self::core::{DOCTOR_LISTING_INSTRUCTIONS, HOSPITAL_SYSTEM_PROMPT, KNOWLEDGE_HEADING};
use crate::types::ChatMessage;

/// The system and user text of one completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    pub system: String,
    pub user: String,
}

impl PromptPayload {
    /// The payload as chat-completion messages, system first.
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: "system".to_string(),
                content: self.system.clone(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: self.user.clone(),
            },
        ]
    }
}

/// Builds the prompt for `question`.
///
/// The knowledge section is included only when `knowledge` has non-whitespace
/// content; the blob itself is passed through untouched.
pub fn build_prompt(knowledge: &str, question: &str) -> PromptPayload {
    let mut user = String::new();
    if !knowledge.trim().is_empty() {
        user.push_str(&format!("{KNOWLEDGE_HEADING}\n{knowledge}\n\n"));
    }
    user.push_str(&format!("Question: {question}\n\n"));
    user.push_str(DOCTOR_LISTING_INSTRUCTIONS);

    PromptPayload {
        system: HOSPITAL_SYSTEM_PROMPT.to_string(),
        user,
    }
}
