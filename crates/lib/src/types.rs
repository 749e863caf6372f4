//! # Shared Data Types

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Who authored a message in the session log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of a session's message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A message in the wire format of the chat-completion API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// A persisted question/answer pair.
///
/// Serialized as a `[question, answer, timestamp]` triple so the history file
/// stays a flat JSON list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord(
    pub String,
    pub String,
    #[serde(with = "iso_timestamp")] pub DateTime<Local>,
);

impl HistoryRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, at: DateTime<Local>) -> Self {
        Self(question.into(), answer.into(), at)
    }

    pub fn question(&self) -> &str {
        &self.0
    }

    pub fn answer(&self) -> &str {
        &self.1
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.2
    }
}

/// Where the assistant text of a turn came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Model,
    Fallback,
}

/// RFC 3339 timestamps on write; on read also accepts the naive
/// `YYYY-MM-DD HH:MM:SS[.ffffff]` form older history files contain.
mod iso_timestamp {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    pub fn serialize<S: Serializer>(at: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Local>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(at.with_timezone(&Local));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(&raw, fmt).ok())
            .and_then(|naive| Local.from_local_datetime(&naive).earliest())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}
