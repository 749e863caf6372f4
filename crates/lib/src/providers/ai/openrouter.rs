use crate::{
    constants::{
        DEFAULT_CHAT_API_URL, DEFAULT_CHAT_MODEL, DEFAULT_CHAT_TIMEOUT_SECS,
        DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE,
    },
    errors::ChatError,
    prompts::PromptPayload,
    providers::ai::ChatProvider,
    types::ChatMessage,
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, instrument};

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_output_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Deserialize, Debug)]
struct CompletionChoice {
    message: ChatMessage,
}

// --- Provider configuration ---

/// Connection settings for an OpenRouter (or other OpenAI-compatible) endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct OpenRouterConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// The bearer token. Required; startup fails without it.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_CHAT_API_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}

fn default_max_output_tokens() -> u32 {
    DEFAULT_MAX_OUTPUT_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_CHAT_TIMEOUT_SECS
}

impl OpenRouterConfig {
    /// A config with the default endpoint and model for `api_key`.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_url: default_api_url(),
            api_key: api_key.into(),
            model: default_model(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// --- OpenRouter Provider implementation ---

/// A provider for the OpenRouter chat-completions API.
#[derive(Clone)]
pub struct OpenRouterProvider {
    client: ReqwestClient,
    config: OpenRouterConfig,
}

impl Debug for OpenRouterProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRouterProvider")
            .field("api_url", &self.config.api_url)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl OpenRouterProvider {
    /// Creates a new `OpenRouterProvider` whose requests time out after
    /// `config.timeout_secs`.
    pub fn new(config: OpenRouterConfig) -> Result<Self, ChatError> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ChatError::ClientBuild)?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl ChatProvider for OpenRouterProvider {
    #[instrument(skip(self, payload), fields(model = %self.config.model))]
    async fn complete(&self, payload: &PromptPayload) -> Result<String, ChatError> {
        let request_body = CompletionRequest {
            model: &self.config.model,
            messages: payload.messages(),
            max_output_tokens: self.config.max_output_tokens,
            temperature: self.config.temperature,
        };

        debug!(system_prompt = %payload.system, user_prompt = %payload.user, "--> Sending prompt to chat provider");

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(ChatError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let raw_body = response.text().await.map_err(ChatError::Transport)?;
        let completion: CompletionResponse = serde_json::from_str(&raw_body)
            .map_err(|e| ChatError::Malformed(e.to_string()))?;

        let reply = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ChatError::Malformed("response contained no choices".to_string()))?;

        debug!("<-- Reply from chat provider: {}", reply);

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(ChatError::EmptyReply);
        }
        Ok(reply.to_string())
    }
}
