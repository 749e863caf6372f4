//! # Application Configuration
//!
//! Defines the configuration structure for `carebot-server` and loads it from a
//! `config.yml` file layered with environment variables.

use carebot::{
    constants::{DEFAULT_HISTORY_FILE, DEFAULT_KNOWLEDGE_FILE},
    format::reveal::RevealConfig,
    providers::ai::OpenRouterConfig,
};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::info;

/// The environment variable holding the chat API key.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
    /// Indicates a required secret is missing or blank.
    MissingSecret(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
            ConfigError::MissingSecret(name) => {
                write!(f, "Missing required secret '{name}'. Set it in the environment or in .env.")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Where the knowledge blob is stored.
    #[serde(default = "default_knowledge_file")]
    pub knowledge_file: String,
    /// Where the question/answer history is stored.
    #[serde(default = "default_history_file")]
    pub history_file: String,
    /// The shared admin secret. Loaded from `ADMIN_PASSWORD`. Empty disables admin access.
    #[serde(default)]
    pub admin_password: Option<String>,
    /// The chat-completion endpoint.
    #[serde(default = "default_chat")]
    pub chat: OpenRouterConfig,
    /// Settings for the streaming word-by-word replay.
    #[serde(default)]
    pub reveal: RevealConfig,
    /// Sessions unused for this many seconds are ended.
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

fn default_port() -> u16 {
    9090
}

fn default_knowledge_file() -> String {
    DEFAULT_KNOWLEDGE_FILE.to_string()
}

fn default_history_file() -> String {
    DEFAULT_HISTORY_FILE.to_string()
}

fn default_session_idle_secs() -> u64 {
    30 * 60
}

fn default_chat() -> OpenRouterConfig {
    OpenRouterConfig::with_api_key("")
}

impl AppConfig {
    /// The admin password, if one is set and non-empty.
    pub fn admin_password(&self) -> Option<&str> {
        self.admin_password.as_deref().filter(|p| !p.is_empty())
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").expect("placeholder pattern is valid")
    })
}

// Reads a file and replaces `${VAR}` placeholders with environment values.
// Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let expanded_content = placeholder_regex().replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// - Top-level keys like `port` and `admin_password` are overridden by `PORT`
///   and `ADMIN_PASSWORD`.
/// - Nested keys are overridden by `CAREBOT_...` variables (e.g.,
///   `CAREBOT_CHAT__MODEL`).
///
/// The chat API key must resolve to a non-blank value, either through the file
/// or directly from `OPENROUTER_API_KEY`; otherwise loading fails with
/// [`ConfigError::MissingSecret`].
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");

    // Layer 1: Programmatic defaults.
    let mut builder = ConfigBuilder::builder()
        .set_default("knowledge_file", DEFAULT_KNOWLEDGE_FILE)?
        .set_default("history_file", DEFAULT_HISTORY_FILE)?;

    // Layer 2: Main config file.
    let main_config_path = match config_path_override {
        Some(override_path) => override_path.to_string(),
        None => format!("{base_path}/config.yml"),
    };
    let main_content = read_and_substitute(&main_config_path)?.ok_or_else(|| {
        ConfigError::NotFound(format!(
            "Main config file not found at '{main_config_path}'."
        ))
    })?;
    info!("Loading configuration from '{main_config_path}'.");
    builder = builder.add_source(File::from_str(&main_content, FileFormat::Yaml));

    let settings = builder
        // Layer 3: Load environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Layer 4: Load prefixed environment variables for deeper overrides.
        .add_source(
            Environment::with_prefix("CAREBOT")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    if config.chat.api_key.trim().is_empty() {
        if let Ok(key) = env::var(API_KEY_ENV) {
            config.chat.api_key = key;
        }
    }
    if config.chat.api_key.trim().is_empty() {
        return Err(ConfigError::MissingSecret(API_KEY_ENV.to_string()));
    }

    Ok(config)
}
