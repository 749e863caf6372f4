//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The `AppState` holds the configuration, the
//! conversation controller with its chat provider, the admin gate, and the
//! session registry, making them accessible to all request handlers.

use crate::{config::AppConfig, session::SessionRegistry};
use carebot::{
    ingest::DocumentExtractor,
    providers::ai::{ChatProvider, OpenRouterProvider},
    AdminGate, Conversation, KnowledgeStore, SessionContext,
};
use carebot_pdf::PdfExtractor;
use std::{path::PathBuf, sync::Arc};
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// Runs chat turns against the configured provider and knowledge file.
    pub conversation: Arc<Conversation>,
    pub admin: AdminGate,
    pub sessions: SessionRegistry,
    /// Turns uploaded documents into knowledge text.
    pub extractor: Arc<dyn DocumentExtractor>,
}

impl AppState {
    /// Opens a new session whose history is read from the configured file.
    pub fn new_session_context(&self) -> SessionContext {
        SessionContext::start(PathBuf::from(&self.config.history_file))
    }
}

/// Builds the shared application state from the configuration, using the
/// OpenRouter provider described by `config.chat`.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let provider = OpenRouterProvider::new(config.chat.clone())?;
    info!(
        api_url = %config.chat.api_url,
        model = %config.chat.model,
        "Initialized chat provider."
    );
    Ok(build_app_state_with_provider(config, Arc::new(provider)))
}

/// Builds the application state around an already constructed provider.
pub fn build_app_state_with_provider(
    config: AppConfig,
    provider: Arc<dyn ChatProvider>,
) -> AppState {
    let knowledge = KnowledgeStore::new(&config.knowledge_file);
    let admin = AdminGate::new(config.admin_password());
    if !admin.is_configured() {
        tracing::warn!("ADMIN_PASSWORD is not set; admin actions are disabled.");
    }

    AppState {
        conversation: Arc::new(Conversation::new(provider, knowledge)),
        admin,
        sessions: SessionRegistry::new(),
        extractor: Arc::new(PdfExtractor::new()),
        config: Arc::new(config),
    }
}
