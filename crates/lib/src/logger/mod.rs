//! # Interaction Logging
//!
//! Every logical event — document upload, generated artifact, free-form
//! query, feedback vote — appends one row to an external audit sink. The
//! sink is append-only and never read back; it is the source of truth for
//! usage review, not for the application. Logging is best-effort by policy:
//! callers `warn!` on a failed append and continue, so a broken sink never
//! blocks the user-facing flow.

pub mod json_file;
pub mod sheet;

use crate::errors::NavigatorError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dyn_clone::DynClone;
use serde::Serialize;
use std::fmt::Debug;

/// Spreadsheet cells reject very long values; every free-text field is cut
/// to this length before transmission.
pub const MAX_FIELD_LEN: usize = 1000;

/// Strips non-ASCII characters and truncates to [`MAX_FIELD_LEN`].
pub fn sanitize_field(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii())
        .take(MAX_FIELD_LEN)
        .collect()
}

/// One append-only audit row capturing an interaction and its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub session_email: String,
    pub document_name: String,
    pub action: String,
    pub result: String,
    pub model: String,
    pub token_estimate: usize,
    pub feedback: Option<String>,
}

impl LogRecord {
    /// Returns a copy with every free-text field sanitized for the sink.
    pub fn sanitized(&self) -> LogRecord {
        LogRecord {
            timestamp: self.timestamp,
            session_email: sanitize_field(&self.session_email),
            document_name: sanitize_field(&self.document_name),
            action: sanitize_field(&self.action),
            result: sanitize_field(&self.result),
            model: sanitize_field(&self.model),
            token_estimate: self.token_estimate,
            feedback: self.feedback.as_deref().map(sanitize_field),
        }
    }

    /// Renders the record as the ordered scalar tuple the sheet sink expects.
    pub fn row(&self) -> Vec<String> {
        vec![
            self.timestamp.to_rfc3339(),
            self.session_email.clone(),
            self.document_name.clone(),
            self.action.clone(),
            self.result.clone(),
            self.model.clone(),
            self.token_estimate.to_string(),
            self.feedback.clone().unwrap_or_default(),
        ]
    }
}

/// A trait for append-only interaction log sinks.
#[async_trait]
pub trait InteractionLogger: Send + Sync + Debug + DynClone {
    /// Appends one record. Implementations sanitize fields themselves; the
    /// best-effort policy (swallow after a warning) belongs to the caller.
    async fn record(&self, record: &LogRecord) -> Result<(), NavigatorError>;
}

dyn_clone::clone_trait_object!(InteractionLogger);

/// A logger that drops everything. Used in tests and logger-less configs.
#[derive(Clone, Debug, Default)]
pub struct NullLogger;

#[async_trait]
impl InteractionLogger for NullLogger {
    async fn record(&self, _record: &LogRecord) -> Result<(), NavigatorError> {
        Ok(())
    }
}
