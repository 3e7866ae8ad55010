use super::{handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/session", post(handlers::create_session_handler))
        .route(
            "/session/{id}/document",
            post(handlers::upload_document_handler)
                .layer(DefaultBodyLimit::max(10 * 1024 * 1024)),
        )
        .route("/session/{id}/action", post(handlers::action_handler))
        .route("/session/{id}/query", post(handlers::query_handler))
        .route("/session/{id}/feedback", post(handlers::feedback_handler))
        .route("/session/{id}/rating", post(handlers::rating_handler))
        .route(
            "/session/{id}/conversation",
            get(handlers::conversation_handler),
        )
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
