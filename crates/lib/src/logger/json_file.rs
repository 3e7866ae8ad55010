//! # Local JSON Append Log
//!
//! An optional local mirror of the interaction log: a single JSON file
//! holding an array of `{timestamp, prompt, response}` entries. Prior
//! contents are read and merged before writing back, so the file survives
//! restarts and external edits between appends.

use crate::{
    errors::NavigatorError,
    logger::{InteractionLogger, LogRecord},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct JsonLogEntry {
    timestamp: String,
    prompt: String,
    response: String,
}

/// A logger that appends records to a local JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileLogger {
    path: PathBuf,
}

impl JsonFileLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl InteractionLogger for JsonFileLogger {
    async fn record(&self, record: &LogRecord) -> Result<(), NavigatorError> {
        let mut entries: Vec<JsonLogEntry> = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| NavigatorError::LogSink(format!("corrupt JSON log: {e}")))?,
            // A missing file is the first append, not an error.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(NavigatorError::LogSink(e.to_string())),
        };

        let sanitized = record.sanitized();
        entries.push(JsonLogEntry {
            timestamp: sanitized.timestamp.to_rfc3339(),
            prompt: sanitized.action,
            response: sanitized.result,
        });

        let serialized = serde_json::to_string_pretty(&entries)
            .map_err(|e| NavigatorError::LogSink(e.to_string()))?;
        tokio::fs::write(&self.path, serialized)
            .await
            .map_err(|e| NavigatorError::LogSink(e.to_string()))?;

        info!(path = %self.path.display(), entries = entries.len(), "Wrote local JSON log.");
        Ok(())
    }
}
