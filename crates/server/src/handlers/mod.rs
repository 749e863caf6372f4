//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for `carebot-server`. The
//! handlers are split into sub-modules by area: general endpoints, session
//! lifecycle, chat turns, and admin actions.

pub mod admin;
pub mod chat;
pub mod general;
pub mod sessions;

pub use admin::*;
pub use chat::*;
pub use general::*;
pub use sessions::*;

// Shared items used by multiple handler modules.
use super::{
    errors::AppError,
    session::SharedSession,
    state::AppState,
    types::{ApiResponse, DebugParams},
};
use axum::{extract::Query, Json};
use serde_json::Value;
use uuid::Uuid;

/// A shared helper function to wrap a successful result in the standard `ApiResponse`
/// format, optionally including debug information if requested.
pub(crate) fn wrap_response<T>(
    result: T,
    debug_params: Query<DebugParams>,
    debug_info: Option<Value>,
) -> Json<ApiResponse<T>> {
    let debug = if debug_params.debug.unwrap_or(false) {
        debug_info
    } else {
        None
    };
    Json(ApiResponse { debug, result })
}

/// Looks up a session, mapping an unknown id to `404 Not Found`.
pub(crate) async fn find_session(app_state: &AppState, id: Uuid) -> Result<SharedSession, AppError> {
    app_state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session '{id}' not found.")))
}
