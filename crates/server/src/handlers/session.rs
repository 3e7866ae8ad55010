//! # Session Lifecycle Handlers
//!
//! Creating a session, reading back its conversation, and recording user
//! feedback (thumbs votes on assistant messages, plus the optional star
//! rating form).

use crate::handlers::{
    interaction_record, log_best_effort, wrap_response, ApiResponse, AppError, AppState,
    DebugParams,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use rfpnav::{Message, Phase, Session, Verdict};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub email: String,
}

#[derive(Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub phase: Phase,
}

/// The handler for `POST /session`. Sessions are keyed by the requesting
/// employee's email, which also identifies their rows in the audit log.
pub async fn create_session_handler(
    State(app_state): State<AppState>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<ApiResponse<CreateSessionResponse>>, AppError> {
    let email = payload.email.trim().to_string();
    if email.is_empty() {
        return Err(AppError::BadRequest(
            "Please enter your email address to start.".to_string(),
        ));
    }

    let session = Session::new(email.clone());
    let response = CreateSessionResponse {
        session_id: session.id,
        phase: session.phase(),
    };
    info!(session_id = %session.id, %email, "Created session.");

    app_state.sessions.write().await.insert(session.id, session);
    Ok(wrap_response(
        response,
        debug_params,
        Some(json!({ "email": email })),
    ))
}

#[derive(Serialize)]
pub struct ConversationResponse {
    pub phase: Phase,
    pub document_name: Option<String>,
    pub messages: Vec<Message>,
    pub feedback: HashMap<u64, Verdict>,
}

/// The handler for `GET /session/{id}/conversation`.
pub async fn conversation_handler(
    State(app_state): State<AppState>,
    Path(session_id): Path<Uuid>,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<ConversationResponse>>, AppError> {
    let sessions = app_state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("unknown session {session_id}")))?;

    let response = ConversationResponse {
        phase: session.phase(),
        document_name: session.document.as_ref().map(|d| d.name.clone()),
        messages: session.messages.clone(),
        feedback: session.feedback.clone(),
    };
    Ok(wrap_response(response, debug_params, None))
}

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub message_id: u64,
    pub verdict: Verdict,
}

#[derive(Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub message_id: u64,
    pub verdict: Verdict,
}

/// The handler for `POST /session/{id}/feedback`. Re-rating the same
/// message overwrites the earlier verdict.
pub async fn feedback_handler(
    State(app_state): State<AppState>,
    Path(session_id): Path<Uuid>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<FeedbackRequest>,
) -> Result<Json<ApiResponse<FeedbackResponse>>, AppError> {
    let record = {
        let mut sessions = app_state.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| AppError::NotFound(format!("unknown session {session_id}")))?;

        session.rate(payload.message_id, payload.verdict)?;

        let content = session
            .message(payload.message_id)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let document_name = session
            .document
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_default();
        interaction_record(
            &session.email,
            &document_name,
            "Feedback",
            &content,
            &app_state.config.completion.model,
            0,
            Some(payload.verdict.label().to_string()),
        )
    };

    log_best_effort(&app_state, &record).await;
    info!(session_id = %session_id, message_id = payload.message_id, verdict = ?payload.verdict, "Recorded feedback.");

    Ok(wrap_response(
        FeedbackResponse {
            message_id: payload.message_id,
            verdict: payload.verdict,
        },
        debug_params,
        None,
    ))
}

#[derive(Deserialize)]
pub struct RatingRequest {
    pub stars: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct RatingResponse {
    pub message: String,
}

/// The handler for `POST /session/{id}/rating`: the optional 1-5 star
/// rating with a free-text comment. Logged only; it does not touch the
/// conversation.
pub async fn rating_handler(
    State(app_state): State<AppState>,
    Path(session_id): Path<Uuid>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<RatingRequest>,
) -> Result<Json<ApiResponse<RatingResponse>>, AppError> {
    if !(1..=5).contains(&payload.stars) {
        return Err(AppError::BadRequest(
            "Rating must be between 1 and 5 stars.".to_string(),
        ));
    }

    let record = {
        let sessions = app_state.sessions.read().await;
        let session = sessions
            .get(&session_id)
            .ok_or_else(|| AppError::NotFound(format!("unknown session {session_id}")))?;
        let document_name = session
            .document
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_default();
        interaction_record(
            &session.email,
            &document_name,
            "Star Rating",
            payload.comment.as_deref().unwrap_or(""),
            &app_state.config.completion.model,
            0,
            Some(format!("{} stars", payload.stars)),
        )
    };

    log_best_effort(&app_state, &record).await;

    Ok(wrap_response(
        RatingResponse {
            message: "Thank you for your feedback.".to_string(),
        },
        debug_params,
        None,
    ))
}
