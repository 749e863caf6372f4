use carebot::{Message, RecentQuestion};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Deserialize, Default)]
pub struct DebugParams {
    pub debug: Option<bool>,
}

#[derive(Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
    pub result: T,
}

// --- Session payloads ---

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub messages: Vec<Message>,
    pub quick_replies: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct SessionMessages {
    pub messages: Vec<Message>,
}

#[derive(Serialize)]
pub struct Deleted {
    pub deleted: bool,
}

// --- Chat payloads ---

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

// --- Admin payloads ---

#[derive(Deserialize)]
pub struct UnlockRequest {
    pub password: String,
}

#[derive(Serialize)]
pub struct UnlockResponse {
    pub unlocked: bool,
}

#[derive(Serialize)]
pub struct KnowledgeSaved {
    /// False when the merged text was blank and the old knowledge was kept.
    pub saved: bool,
    pub characters: usize,
    pub documents: usize,
}

#[derive(Serialize)]
pub struct HistoryView {
    pub questions: Vec<RecentQuestion>,
    pub total: usize,
}
