//! # Chat Endpoint Tests
//!
//! Runs full turns through the router against a mocked completion endpoint.

mod common;

use anyhow::Result;
use carebot::{constants::FALLBACK_MESSAGES, HistoryStore};
use common::{completion_body, TestApp, COMPLETIONS_PATH};
use httpmock::Method;
use serde_json::{json, Value};

const TABLE_REPLY: &str = "Here is tonight's schedule:\n\
| Doctor | Available Time Slot | Fees |\n\
|--------|---------------------|------|\n\
| Dr. Usman Tariq | 5:00 PM – 9:00 PM | 2,200 |";

#[tokio::test]
async fn test_chat_turn_formats_doctor_table() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    let mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST)
            .path(COMPLETIONS_PATH)
            .header("authorization", "Bearer test-key")
            .body_contains("\"model\":\"mock-chat-model\"")
            .body_contains("Question: Who is available tonight?");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(completion_body(TABLE_REPLY));
    });
    let session_id = app.create_session().await?;

    // --- 2. Act ---
    let response = app.chat(&session_id, "Who is available tonight?").await?;

    // --- 3. Assert ---
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await?;
    let result = &body["result"];
    assert_eq!(
        result["reply"],
        "Here is tonight's schedule:\nAvailable Doctors:\nDr. Usman Tariq\nAvailable: 5:00 PM – 9:00 PM\nConsultation Fee: 2,200 PKR"
    );
    assert_eq!(result["source"], "model");
    assert_eq!(result["doctors"][0]["name"], "Dr. Usman Tariq");
    assert_eq!(result["doctors"][0]["fee"], "2,200");
    mock.assert();

    // The message log and the history file both hold the turn.
    let messages: Value = app
        .client
        .get(app.url(&format!("/sessions/{session_id}/messages")))
        .send()
        .await?
        .json()
        .await?;
    let messages = messages["result"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"], "Who is available tonight?");
    assert_eq!(messages[2]["content"], result["reply"]);

    let history = HistoryStore::load(&app.history_path);
    assert_eq!(history.len(), 1);
    assert_eq!(history.records()[0].question(), "Who is available tonight?");
    Ok(())
}

#[tokio::test]
async fn test_provider_error_returns_fallback() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    let mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST).path(COMPLETIONS_PATH);
        then.status(500).body("upstream exploded");
    });
    let session_id = app.create_session().await?;

    // --- 2. Act ---
    let response = app.chat(&session_id, "What are visiting hours?").await?;

    // --- 3. Assert ---
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await?;
    let reply = body["result"]["reply"].as_str().unwrap();
    assert!(FALLBACK_MESSAGES.contains(&reply));
    assert_eq!(body["result"]["source"], "fallback");
    assert_eq!(mock.hits(), 1);

    let history = HistoryStore::load(&app.history_path);
    assert_eq!(history.records()[0].answer(), reply);
    Ok(())
}

#[tokio::test]
async fn test_knowledge_is_injected_into_the_prompt() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    std::fs::write(&app.knowledge_path, "Visiting hours are 4 PM to 8 PM.")?;
    let mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST)
            .path(COMPLETIONS_PATH)
            .body_contains("Hospital Knowledge:\\nVisiting hours are 4 PM to 8 PM.");
        then.status(200)
            .header("content-type", "application/json")
            .json_body(completion_body("Visiting hours are 4 PM to 8 PM."));
    });
    let session_id = app.create_session().await?;

    // --- 2. Act ---
    let body: Value = app
        .chat(&session_id, "When can I visit?")
        .await?
        .json()
        .await?;

    // --- 3. Assert ---
    assert_eq!(body["result"]["reply"], "Visiting hours are 4 PM to 8 PM.");
    assert_eq!(body["result"]["source"], "model");
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn test_blank_message_is_rejected() -> Result<()> {
    let app = TestApp::spawn().await?;
    let mock = app.mock_reply("unused");
    let session_id = app.create_session().await?;

    let response = app.chat(&session_id, "   ").await?;

    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(mock.hits(), 0);
    Ok(())
}

#[tokio::test]
async fn test_chat_on_unknown_session_is_not_found() -> Result<()> {
    let app = TestApp::spawn().await?;

    let response = app
        .chat(&uuid::Uuid::new_v4().to_string(), "Hello")
        .await?;

    assert_eq!(response.status().as_u16(), 404);
    Ok(())
}

#[tokio::test]
async fn test_stream_replays_reply_word_by_word() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn().await?;
    let _mock = app.mock_reply("We open at 8 AM.");
    let session_id = app.create_session().await?;

    // --- 2. Act ---
    let response = app
        .client
        .post(app.url(&format!("/sessions/{session_id}/chat/stream")))
        .json(&json!({ "message": "When do you open?" }))
        .send()
        .await?;

    // --- 3. Assert ---
    assert_eq!(response.status().as_u16(), 200);
    assert!(response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .starts_with("text/event-stream"));
    let body = response.text().await?;
    let events = parse_sse(&body);

    let reveals: Vec<&str> = events
        .iter()
        .filter(|(event, _)| event == "reveal")
        .map(|(_, data)| data.as_str())
        .collect();
    assert_eq!(
        reveals,
        vec!["We ", "We open ", "We open at ", "We open at 8 ", "We open at 8 AM. "]
    );

    let (last_event, last_data) = events.last().unwrap();
    assert_eq!(last_event, "done");
    let done: Value = serde_json::from_str(last_data)?;
    assert_eq!(done["reply"], "We open at 8 AM.");
    assert_eq!(done["source"], "model");

    // The turn was stored before the replay began.
    let history = HistoryStore::load(&app.history_path);
    assert_eq!(history.records()[0].answer(), "We open at 8 AM.");
    Ok(())
}

/// Splits an SSE body into `(event, data)` pairs.
fn parse_sse(body: &str) -> Vec<(String, String)> {
    body.split("\n\n")
        .filter_map(|block| {
            let mut event = None;
            let mut data: Vec<&str> = Vec::new();
            for line in block.lines() {
                if let Some(value) = line.strip_prefix("event:") {
                    event = Some(value.trim().to_string());
                } else if let Some(value) = line.strip_prefix("data:") {
                    data.push(value.strip_prefix(' ').unwrap_or(value));
                }
            }
            event.map(|event| (event, data.join("\n")))
        })
        .collect()
}
