//! # Generation Handlers
//!
//! The two ways a user gets text out of the model: the canned one-click
//! actions (executive summary, pipeline data) and free-form questions.
//!
//! Both follow the same shape: append the user message, assemble the prompt
//! from the bounded document text, make exactly one completion call, and
//! append the assistant message only on success. A failed call leaves the
//! user message in place and surfaces the error; the user re-triggers the
//! action to retry.

use crate::handlers::{
    interaction_record, log_best_effort, wrap_response, ApiResponse, AppError, AppState,
    DebugParams,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use rfpnav::{
    chunk::{bounded_text, estimate_words},
    prompts::{self, PromptAction},
    providers::completion::QUERY_MAX_TOKENS,
    ChatMessage, NavigatorError,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

#[derive(Deserialize)]
pub struct ActionRequest {
    pub action: PromptAction,
}

#[derive(Deserialize)]
pub struct QueryRequest {
    pub question: String,
}

#[derive(Serialize, Deserialize)]
pub struct GenerationResponse {
    pub message_id: u64,
    pub text: String,
}

/// Snapshot of session fields needed to build a prompt, taken under the
/// read lock so the completion call runs without holding it.
struct PromptInputs {
    email: String,
    document_name: String,
    document_text: String,
}

async fn prompt_inputs(
    app_state: &AppState,
    session_id: Uuid,
) -> Result<PromptInputs, AppError> {
    let sessions = app_state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("unknown session {session_id}")))?;
    let document = session.document.as_ref().ok_or_else(|| {
        NavigatorError::Session("Please load your RFP before asking questions.".to_string())
    })?;
    Ok(PromptInputs {
        email: session.email.clone(),
        document_name: document.name.clone(),
        document_text: document.text.clone(),
    })
}

/// The handler for `POST /session/{id}/action`: one of the canned document
/// summaries, sent as a stateless single turn.
pub async fn action_handler(
    State(app_state): State<AppState>,
    Path(session_id): Path<Uuid>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<ActionRequest>,
) -> Result<Json<ApiResponse<GenerationResponse>>, AppError> {
    let inputs = prompt_inputs(&app_state, session_id).await?;
    let bounded = bounded_text(&inputs.document_text, app_state.config.max_prompt_words);
    let prompt = payload.action.build_prompt(&bounded);
    let sampling = app_state.config.sampling_config();

    info!(session_id = %session_id, action = %payload.action.label(), "Running canned action.");

    // The user message goes in before the call so a failure still shows
    // what was asked.
    {
        let mut sessions = app_state.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| AppError::NotFound(format!("unknown session {session_id}")))?;
        session.push_user(payload.action.label());
    }

    let result = app_state
        .provider
        .complete(prompts::SYSTEM_PROMPT, &[], &prompt, &sampling)
        .await?;

    let message_id = {
        let mut sessions = app_state.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| AppError::NotFound(format!("unknown session {session_id}")))?;
        session.push_assistant(result.clone())
    };

    let record = interaction_record(
        &inputs.email,
        &inputs.document_name,
        payload.action.label(),
        &result,
        &sampling.model,
        estimate_words(&prompt) + estimate_words(&result),
        None,
    );
    log_best_effort(&app_state, &record).await;

    let debug_info = json!({
        "prompt_words": estimate_words(&prompt),
        "model": sampling.model,
    });
    Ok(wrap_response(
        GenerationResponse {
            message_id,
            text: result,
        },
        debug_params,
        Some(debug_info),
    ))
}

/// The handler for `POST /session/{id}/query`: a free-form question,
/// grounded in the document text plus the windowed conversation context.
pub async fn query_handler(
    State(app_state): State<AppState>,
    Path(session_id): Path<Uuid>,
    debug_params: Query<DebugParams>,
    Json(payload): Json<QueryRequest>,
) -> Result<Json<ApiResponse<GenerationResponse>>, AppError> {
    let question = payload.question.trim().to_string();
    if question.is_empty() {
        return Err(AppError::BadRequest("Question must not be empty.".to_string()));
    }

    let inputs = prompt_inputs(&app_state, session_id).await?;
    let bounded = bounded_text(&inputs.document_text, app_state.config.max_prompt_words);
    let prompt = prompts::free_form_query(&bounded, &question);
    let sampling = app_state
        .config
        .sampling_config()
        .with_max_tokens(QUERY_MAX_TOKENS);

    info!(session_id = %session_id, "Running free-form query.");

    // Window the prior turns, then append the user message so a failed
    // completion still leaves exactly the question behind.
    let context: Vec<ChatMessage> = {
        let mut sessions = app_state.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| AppError::NotFound(format!("unknown session {session_id}")))?;
        let context = session.context_window(app_state.config.max_context_words);
        session.push_user(question.clone());
        context
    };

    let result = app_state
        .provider
        .complete(prompts::SYSTEM_PROMPT, &context, &prompt, &sampling)
        .await?;

    let message_id = {
        let mut sessions = app_state.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| AppError::NotFound(format!("unknown session {session_id}")))?;
        session.push_assistant(result.clone())
    };

    let record = interaction_record(
        &inputs.email,
        &inputs.document_name,
        &question,
        &result,
        &sampling.model,
        estimate_words(&prompt) + estimate_words(&result),
        None,
    );
    log_best_effort(&app_state, &record).await;

    let debug_info = json!({
        "prompt_words": estimate_words(&prompt),
        "context_messages": context.len(),
        "model": sampling.model,
    });
    Ok(wrap_response(
        GenerationResponse {
            message_id,
            text: result,
        },
        debug_params,
        Some(debug_info),
    ))
}
