//! # Spreadsheet Log Sink
//!
//! Appends audit rows to a spreadsheet backend through its HTTP append
//! endpoint (the Google Sheets `values:append` shape). The sink provides
//! atomic row appends, so concurrent sessions need no coordination here;
//! within one session, ordering follows the request flow.

use crate::{
    errors::NavigatorError,
    logger::{InteractionLogger, LogRecord},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct AppendRequest {
    values: Vec<Vec<String>>,
}

/// A logger that appends one spreadsheet row per record.
#[derive(Clone, Debug)]
pub struct SheetLogger {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
}

impl SheetLogger {
    pub fn new(api_url: String, api_key: Option<String>) -> Result<Self, NavigatorError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(NavigatorError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
        })
    }
}

#[async_trait]
impl InteractionLogger for SheetLogger {
    async fn record(&self, record: &LogRecord) -> Result<(), NavigatorError> {
        let body = AppendRequest {
            values: vec![record.sanitized().row()],
        };

        let mut request_builder = self.client.post(&self.api_url);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .json(&body)
            .send()
            .await
            .map_err(|e| NavigatorError::LogSink(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NavigatorError::LogSink(format!(
                "append failed with status {}",
                response.status()
            )));
        }

        info!(action = %record.action, "Appended interaction row to sheet log.");
        Ok(())
    }
}
