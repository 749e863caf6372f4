pub mod openrouter;

use crate::{errors::ChatError, prompts::PromptPayload};
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use openrouter::{OpenRouterConfig, OpenRouterProvider};
use std::fmt::Debug;

/// A trait for sending a prompt to a chat-completion service.
///
/// Implementations report every failure as a [`ChatError`]; choosing what the
/// user sees instead is the caller's job.
#[async_trait]
pub trait ChatProvider: Send + Sync + Debug + DynClone {
    /// Sends `payload` and returns the trimmed, non-empty reply text.
    async fn complete(&self, payload: &PromptPayload) -> Result<String, ChatError>;
}

dyn_clone::clone_trait_object!(ChatProvider);
