use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use carebot::AdminError;
use serde_json::json;
use tracing::{error, warn};

/// A custom error type for the server application.
///
/// This enum encapsulates the errors a handler can return, allowing them to be
/// converted into appropriate HTTP responses.
pub enum AppError {
    /// The session id is unknown.
    NotFound(String),
    /// The request is well-formed but not acceptable.
    BadRequest(String),
    /// A wrong admin password.
    Unauthorized(String),
    /// Errors originating from the admin actions.
    Admin(AdminError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<AdminError> for AppError {
    fn from(err: AdminError) -> Self {
        AppError::Admin(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Admin(err) => match err {
                AdminError::Locked => {
                    warn!("Rejected admin request on a locked session.");
                    (StatusCode::FORBIDDEN, err.to_string())
                }
                AdminError::Knowledge(_) | AdminError::History(_) => {
                    error!("AdminError: {:?}", err);
                    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
                }
            },
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
