//! # Admin Handlers
//!
//! Knowledge curation and history review. Every route except `unlock` answers
//! `403 Forbidden` until the session has been unlocked with the admin password.

use super::{find_session, wrap_response, ApiResponse, AppError, AppState, DebugParams};
use crate::types::{Deleted, HistoryView, KnowledgeSaved, UnlockRequest, UnlockResponse};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::Multipart;
use carebot::{
    ingest::{collect_document_texts, UploadedDocument},
    AdminGate, KnowledgePreview,
};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

pub async fn unlock_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<UnlockRequest>,
) -> Result<Json<ApiResponse<UnlockResponse>>, AppError> {
    let session = find_session(&app_state, id).await?;
    let mut context = session.lock().await;
    if !app_state.admin.unlock(&mut context, &payload.password) {
        return Err(AppError::Unauthorized("Incorrect password.".to_string()));
    }
    Ok(wrap_response(
        UnlockResponse { unlocked: true },
        debug_params,
        None,
    ))
}

/// Returns the current knowledge: a preview, the full text for editing, and its
/// character count.
pub async fn get_knowledge_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<KnowledgePreview>>, AppError> {
    let session = find_session(&app_state, id).await?;
    let context = session.lock().await;
    let knowledge = app_state.conversation.knowledge();
    let preview = app_state.admin.knowledge_preview(&context, knowledge)?;
    let debug_info = json!({ "path": knowledge.path().display().to_string() });
    Ok(wrap_response(preview, debug_params, Some(debug_info)))
}

/// Replaces the knowledge blob with the text of the uploaded documents (repeated
/// `file` parts) followed by an optional manual `text` part.
pub async fn save_knowledge_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<KnowledgeSaved>>, AppError> {
    let session = find_session(&app_state, id).await?;
    let context = session.lock().await;
    AdminGate::require_unlocked(&context)?;

    let mut documents: Vec<UploadedDocument> = Vec::new();
    let mut manual_text = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("uploaded_file.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?
                    .to_vec();
                info!(document = %file_name, bytes = data.len(), "Received knowledge document.");
                documents.push(UploadedDocument {
                    name: file_name,
                    data,
                });
            }
            "text" => {
                manual_text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read text: {e}")))?;
            }
            _ => warn!("Ignoring unknown multipart field: {}", name),
        }
    }

    let document_count = documents.len();
    let extractor = app_state.extractor.clone();
    let pdf_texts = tokio::task::spawn_blocking(move || {
        collect_document_texts(extractor.as_ref(), &documents)
    })
    .await
    .map_err(anyhow::Error::from)?;

    let knowledge = app_state.conversation.knowledge();
    let saved = app_state
        .admin
        .save_knowledge(&context, knowledge, &pdf_texts, &manual_text)?;
    let characters = match &saved {
        Some(text) => text.chars().count(),
        None => knowledge.load().chars().count(),
    };

    let debug_info = json!({
        "extracted_characters": pdf_texts.iter().map(|t| t.chars().count()).collect::<Vec<_>>(),
    });
    Ok(wrap_response(
        KnowledgeSaved {
            saved: saved.is_some(),
            characters,
            documents: document_count,
        },
        debug_params,
        Some(debug_info),
    ))
}

pub async fn delete_knowledge_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<Deleted>>, AppError> {
    let session = find_session(&app_state, id).await?;
    let context = session.lock().await;
    app_state
        .admin
        .delete_knowledge(&context, app_state.conversation.knowledge())?;
    Ok(wrap_response(Deleted { deleted: true }, debug_params, None))
}

pub async fn get_history_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<HistoryView>>, AppError> {
    let session = find_session(&app_state, id).await?;
    let context = session.lock().await;
    let questions = app_state.admin.recent_questions(&context)?;
    Ok(wrap_response(
        HistoryView {
            questions,
            total: context.history.len(),
        },
        debug_params,
        None,
    ))
}

pub async fn delete_history_handler(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<Deleted>>, AppError> {
    let session = find_session(&app_state, id).await?;
    let mut context = session.lock().await;
    app_state.admin.delete_history(&mut context)?;
    Ok(wrap_response(Deleted { deleted: true }, debug_params, None))
}
