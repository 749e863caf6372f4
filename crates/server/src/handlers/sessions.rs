//! # Session Lifecycle Handlers

use super::{find_session, wrap_response, ApiResponse, AppError, AppState, DebugParams};
use crate::types::{Deleted, SessionCreated, SessionMessages};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use carebot::constants::QUICK_REPLIES;
use serde_json::json;
use uuid::Uuid;

/// Starts a session. The history file is read once, here.
pub async fn create_session_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
) -> Json<ApiResponse<SessionCreated>> {
    let context = app_state.new_session_context();
    let messages = context.messages().to_vec();
    let history_records = context.history.len();
    let (session_id, _) = app_state.sessions.insert(context).await;

    wrap_response(
        SessionCreated {
            session_id,
            messages,
            quick_replies: QUICK_REPLIES.to_vec(),
        },
        debug_params,
        Some(json!({ "history_records": history_records })),
    )
}

pub async fn get_messages_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<SessionMessages>>, AppError> {
    let session = find_session(&app_state, id).await?;
    let messages = session.lock().await.messages().to_vec();
    Ok(wrap_response(SessionMessages { messages }, debug_params, None))
}

pub async fn end_session_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<Deleted>>, AppError> {
    if !app_state.sessions.remove(&id).await {
        return Err(AppError::NotFound(format!("Session '{id}' not found.")));
    }
    Ok(wrap_response(Deleted { deleted: true }, debug_params, None))
}
