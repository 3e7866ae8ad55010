//! # Application State
//!
//! The shared state handed to every request handler: the configuration, the
//! instantiated completion provider, the interaction log sinks, and the map
//! of live sessions. Sessions are owned structs behind one async lock;
//! handlers clone what they need out of the lock and never hold it across a
//! network call.

use crate::config::AppConfig;
use rfpnav::{
    logger::{json_file::JsonFileLogger, sheet::SheetLogger, InteractionLogger},
    providers::completion::{gemini::GeminiProvider, openai::OpenAiProvider},
    CompletionProvider, Session,
};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::RwLock;
use uuid::Uuid;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub provider: Arc<dyn CompletionProvider>,
    /// Zero or more audit sinks; appends are best-effort.
    pub loggers: Arc<Vec<Box<dyn InteractionLogger>>>,
    pub sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

/// Builds the shared application state from the configuration.
///
/// Instantiates the configured completion provider and log sinks. A missing
/// credential for a hosted provider is a fatal configuration error at
/// startup rather than a latent one at first use.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let provider: Arc<dyn CompletionProvider> = match config.completion.provider.as_str() {
        "openai" => {
            let api_url = config
                .completion
                .api_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1/chat/completions".to_string());
            if config.completion.api_key.is_none() {
                return Err(anyhow::anyhow!(
                    "completion.api_key is required for the openai provider. Set OPENAI_API_KEY."
                ));
            }
            Arc::new(OpenAiProvider::new(
                api_url,
                config.completion.api_key.clone(),
                timeout,
            )?)
        }
        "gemini" => {
            let api_key = config.completion.api_key.clone().ok_or_else(|| {
                anyhow::anyhow!("completion.api_key is required for the gemini provider")
            })?;
            // If api_url is not provided, construct it from the model name.
            let api_url = config.completion.api_url.clone().unwrap_or_else(|| {
                format!(
                    "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                    config.completion.model
                )
            });
            Arc::new(GeminiProvider::new(api_url, api_key, timeout)?)
        }
        other => {
            return Err(anyhow::anyhow!(
                "Unsupported completion provider type '{other}'"
            ));
        }
    };

    let mut loggers: Vec<Box<dyn InteractionLogger>> = Vec::new();
    if let Some(sink) = &config.log_sink {
        loggers.push(Box::new(SheetLogger::new(
            sink.api_url.clone(),
            sink.api_key.clone(),
        )?));
        tracing::info!(api_url = %sink.api_url, "Initialized sheet log sink.");
    }
    if let Some(path) = &config.json_log_path {
        loggers.push(Box::new(JsonFileLogger::new(path)));
        tracing::info!(path = %path, "Initialized local JSON log.");
    }
    if loggers.is_empty() {
        tracing::warn!("No log sink configured; interactions will not be recorded.");
    }

    Ok(AppState {
        config: Arc::new(config),
        provider,
        loggers: Arc::new(loggers),
        sessions: Arc::new(RwLock::new(HashMap::new())),
    })
}
