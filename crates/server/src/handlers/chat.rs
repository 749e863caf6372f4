//! # Chat Handlers
//!
//! Both endpoints run the full turn (prompt, completion, formatting, history
//! write) before responding. The streaming variant then replays the finished
//! reply word by word as Server-Sent Events.

use super::{find_session, wrap_response, ApiResponse, AppError, AppState, DebugParams};
use crate::types::ChatRequest;
use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use carebot::{format::reveal::WordReveal, TurnOutcome};
use futures::stream::{self, Stream, StreamExt};
use serde_json::json;
use std::convert::Infallible;
use tracing::info;
use uuid::Uuid;

async fn run_turn(
    app_state: &AppState,
    id: Uuid,
    message: &str,
) -> Result<(TurnOutcome, usize), AppError> {
    if message.trim().is_empty() {
        return Err(AppError::BadRequest("Message must not be empty.".to_string()));
    }
    let session = find_session(app_state, id).await?;
    let mut context = session.lock().await;
    info!(session_id = %id, "Received chat message.");
    let outcome = app_state.conversation.handle_turn(&mut context, message).await;
    Ok((outcome, context.history.len()))
}

pub async fn chat_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ApiResponse<TurnOutcome>>, AppError> {
    let (outcome, history_records) = run_turn(&app_state, id, &payload.message).await?;
    let debug_info = json!({
        "history_saved": outcome.history_saved,
        "history_records": history_records,
    });
    Ok(wrap_response(outcome, debug_params, Some(debug_info)))
}

/// Streams `reveal` events carrying growing prefixes of the reply, then one
/// `done` event with the full outcome. With the replay disabled only the
/// `done` event is sent.
pub async fn chat_stream_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let (outcome, _) = run_turn(&app_state, id, &payload.message).await?;

    let reveal = app_state.config.reveal;
    let frames: Vec<String> = if reveal.enabled {
        WordReveal::new(&outcome.reply).collect()
    } else {
        Vec::new()
    };
    let delay = reveal.word_delay();
    let done = Event::default()
        .event("done")
        .json_data(&outcome)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode reply event: {e}")))?;

    let reveal_events = stream::iter(frames).then(move |frame| async move {
        tokio::time::sleep(delay).await;
        Ok::<_, Infallible>(Event::default().event("reveal").data(frame))
    });
    let stream = reveal_events.chain(stream::once(async move { Ok(done) }));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
