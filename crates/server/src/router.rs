use super::{handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/sessions", post(handlers::create_session_handler))
        .route("/sessions/{id}", delete(handlers::end_session_handler))
        .route("/sessions/{id}/messages", get(handlers::get_messages_handler))
        .route("/sessions/{id}/chat", post(handlers::chat_handler))
        .route(
            "/sessions/{id}/chat/stream",
            post(handlers::chat_stream_handler),
        )
        .route(
            "/sessions/{id}/admin/unlock",
            post(handlers::unlock_handler),
        )
        .route(
            "/sessions/{id}/admin/knowledge",
            get(handlers::get_knowledge_handler)
                .post(handlers::save_knowledge_handler)
                .delete(handlers::delete_knowledge_handler)
                .layer(DefaultBodyLimit::max(10 * 1024 * 1024)),
        )
        .route(
            "/sessions/{id}/admin/history",
            get(handlers::get_history_handler).delete(handlers::delete_history_handler),
        )
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
