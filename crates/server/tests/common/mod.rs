//! # Common Test Utilities
//!
//! `TestApp` spawns the real router on a random port with its files in a
//! scratch directory and its chat endpoint pointed at an `httpmock` server.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use carebot_server::{
    config::{self, AppConfig},
    router,
    state::{build_app_state, AppState},
};
use httpmock::{Method, Mock, MockServer};
use reqwest::Client;
use serde_json::{json, Value};
use std::{fs, net::SocketAddr, path::PathBuf};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

pub const ADMIN_PASSWORD: &str = "test-admin";
pub const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    pub knowledge_path: PathBuf,
    pub history_path: PathBuf,
    _data_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application server and returns a `TestApp` instance.
    pub async fn spawn() -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start();
        let data_dir = tempdir()?;
        let knowledge_path = data_dir.path().join("knowledge.txt");
        let history_path = data_dir.path().join("chat_history.json");

        let config_path = data_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
knowledge_file: "{}"
history_file: "{}"
admin_password: "{ADMIN_PASSWORD}"
chat:
  api_url: "{}"
  api_key: "test-key"
  model: "mock-chat-model"
  timeout_secs: 5
reveal:
  enabled: true
  word_delay_ms: 0
"#,
            knowledge_path.display(),
            history_path.display(),
            mock_server.url(COMPLETIONS_PATH),
        );
        fs::write(&config_path, config_content)?;

        let config: AppConfig = config::get_config(config_path.to_str())?;
        let app_state = build_app_state(config).await?;

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let app = router::create_router(app_state.clone());
        let server_handle = tokio::spawn(async move {
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state,
            knowledge_path,
            history_path,
            _data_dir: data_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Starts a session and returns its id.
    pub async fn create_session(&self) -> Result<String> {
        let body: Value = self
            .client
            .post(self.url("/sessions"))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body["result"]["session_id"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("session_id missing from {body}"))?
            .to_string())
    }

    /// Starts a session and unlocks admin access on it.
    pub async fn create_admin_session(&self) -> Result<String> {
        let session_id = self.create_session().await?;
        self.client
            .post(self.url(&format!("/sessions/{session_id}/admin/unlock")))
            .json(&json!({ "password": ADMIN_PASSWORD }))
            .send()
            .await?
            .error_for_status()?;
        Ok(session_id)
    }

    pub async fn chat(&self, session_id: &str, message: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url(&format!("/sessions/{session_id}/chat")))
            .json(&json!({ "message": message }))
            .send()
            .await?)
    }

    /// Answers every completion request with `reply`.
    pub fn mock_reply(&self, reply: &str) -> Mock<'_> {
        let body = completion_body(reply);
        self.mock_server.mock(|when, then| {
            when.method(Method::POST).path(COMPLETIONS_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(body);
        })
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// An OpenAI-compatible completion response carrying `reply`.
pub fn completion_body(reply: &str) -> Value {
    json!({
        "id": "cmpl-test",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": reply },
            "finish_reason": "stop"
        }]
    })
}
