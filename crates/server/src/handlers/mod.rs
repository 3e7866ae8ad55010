//! # API Route Handlers
//!
//! All Axum route handlers for the `rfpnav-server`, split by concern:
//! session lifecycle, document upload, generation (canned actions and
//! free-form queries), and the liveness endpoints.

pub mod document;
pub mod general;
pub mod generation;
pub mod session;

pub use document::*;
pub use general::*;
pub use generation::*;
pub use session::*;

// Shared items used by multiple handler modules.
pub(crate) use super::{
    errors::AppError,
    state::AppState,
    types::{ApiResponse, DebugParams},
};
use axum::{extract::Query, Json};
use chrono::Utc;
use rfpnav::logger::LogRecord;
use serde_json::Value;
use tracing::warn;

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

/// Builds a log record for one logical event.
pub(crate) fn interaction_record(
    email: &str,
    document_name: &str,
    action: &str,
    result: &str,
    model: &str,
    token_estimate: usize,
    feedback: Option<String>,
) -> LogRecord {
    LogRecord {
        timestamp: Utc::now(),
        session_email: email.to_string(),
        document_name: document_name.to_string(),
        action: action.to_string(),
        result: result.to_string(),
        model: model.to_string(),
        token_estimate,
        feedback,
    }
}

/// Appends a record to every configured sink. A failed append is downgraded
/// to a warning and never blocks the user-facing flow.
pub(crate) async fn log_best_effort(app_state: &AppState, record: &LogRecord) {
    for logger in app_state.loggers.iter() {
        if let Err(e) = logger.record(record).await {
            warn!(action = %record.action, "Failed to append interaction log: {e}");
        }
    }
}
