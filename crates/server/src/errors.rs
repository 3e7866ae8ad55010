use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rfpnav::NavigatorError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// Every handler failure is converted into an HTTP response here; nothing
/// propagates far enough to take down a session.
pub enum AppError {
    /// Errors originating from the `rfpnav` pipeline.
    Navigator(NavigatorError),
    /// A session or message that does not exist.
    NotFound(String),
    /// A request the client can fix (bad action name, invalid rating, ...).
    BadRequest(String),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<NavigatorError> for AppError {
    fn from(err: NavigatorError) -> Self {
        AppError::Navigator(err)
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
            AppError::Navigator(err) => {
                error!("NavigatorError: {:?}", err);
                match err {
                    NavigatorError::Configuration(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Server is not configured correctly: {e}"),
                    ),
                    NavigatorError::DocumentParse(e) => (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        format!("Could not read the uploaded PDF: {e}"),
                    ),
                    NavigatorError::CompletionRequest(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Request to completion API failed: {e}"),
                    ),
                    NavigatorError::CompletionDeserialization(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Failed to deserialize completion API response: {e}"),
                    ),
                    NavigatorError::CompletionApi(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Completion API error: {e}"),
                    ),
                    NavigatorError::LogSink(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Log sink error: {e}"),
                    ),
                    NavigatorError::ReqwestClientBuild(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to build HTTP client: {e}"),
                    ),
                    NavigatorError::Session(e) => (StatusCode::BAD_REQUEST, e),
                }
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
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
