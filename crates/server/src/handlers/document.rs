//! # Document Upload Handler
//!
//! Receives the RFP PDF as a multipart upload, extracts its text, and
//! replaces the session's active document. A failed extraction leaves the
//! prior document and conversation untouched; a successful one always
//! resets both.

use crate::handlers::{
    interaction_record, log_best_effort, wrap_response, ApiResponse, AppError, AppState,
    DebugParams,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::Multipart;
use rfpnav::{extract_text, session::GREETING, Document, ExtractOptions};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Serialize, Deserialize)]
pub struct UploadDocumentResponse {
    pub document_name: String,
    pub page_count: u32,
    pub word_count: usize,
    /// Set when the PDF produced implausibly little text (likely scanned
    /// images; there is no OCR).
    pub short_text_warning: bool,
    pub greeting: String,
}

/// The handler for `POST /session/{id}/document`.
pub async fn upload_document_handler(
    State(app_state): State<AppState>,
    Path(session_id): Path<Uuid>,
    debug_params: Query<DebugParams>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadDocumentResponse>>, AppError> {
    let mut pdf_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(anyhow::Error::from)? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                file_name = Some(field.file_name().unwrap_or("uploaded_file.pdf").to_string());
                pdf_data = Some(field.bytes().await.map_err(anyhow::Error::from)?.to_vec());
            }
            _ => warn!("Ignoring unknown multipart field: {}", name),
        }
    }

    let pdf_data = pdf_data.ok_or_else(|| {
        AppError::BadRequest("PDF data not found in request. Provide a 'file' part.".to_string())
    })?;
    let file_name = file_name.unwrap_or_else(|| "uploaded_file.pdf".to_string());
    let size = pdf_data.len();

    // Extract before touching the session: a corrupt PDF must not disturb
    // the existing conversation.
    let options = ExtractOptions {
        include_page_markers: app_state.config.include_page_markers,
    };
    let extraction = extract_text(pdf_data, options).await?;

    let document = Document {
        name: file_name.clone(),
        short_warning: extraction.is_suspiciously_short(),
        text: extraction.text,
        page_count: extraction.page_count,
        word_count: extraction.word_count,
    };

    let record = {
        let mut sessions = app_state.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| AppError::NotFound(format!("unknown session {session_id}")))?;
        session.load_document(document.clone());
        interaction_record(
            &session.email,
            &file_name,
            "Document Upload",
            &format!(
                "{} pages, {} words",
                document.page_count, document.word_count
            ),
            &app_state.config.completion.model,
            document.word_count,
            None,
        )
    };

    log_best_effort(&app_state, &record).await;
    info!(
        session_id = %session_id,
        file = %file_name,
        pages = document.page_count,
        "Loaded document into session."
    );

    let response = UploadDocumentResponse {
        document_name: file_name.clone(),
        page_count: document.page_count,
        word_count: document.word_count,
        short_text_warning: document.short_warning,
        greeting: GREETING.to_string(),
    };
    let debug_info = json!({ "file": file_name, "size": size });
    Ok(wrap_response(response, debug_params, Some(debug_info)))
}
