//! # Application Configuration
//!
//! Loads the server configuration from a `config.yml` file layered with
//! environment variables. `${VAR}` references in the file are substituted
//! from the environment before parsing, which is how credentials reach the
//! config without living in the file itself. Nested keys can be overridden
//! with `RFPNAV_`-prefixed variables (e.g. `RFPNAV_COMPLETION__MODEL`).

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use rfpnav::SamplingConfig;
use serde::Deserialize;
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Timeout applied to every completion request. There is no retry; a
    /// timed-out action is simply reported and can be re-triggered.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Word budget for document text embedded into a prompt.
    #[serde(default = "default_max_prompt_words")]
    pub max_prompt_words: usize,
    /// Word budget for the conversation context window on free-form queries.
    #[serde(default = "default_max_context_words")]
    pub max_context_words: usize,
    /// Insert `--- Page N ---` markers into extracted text.
    #[serde(default = "default_include_page_markers")]
    pub include_page_markers: bool,
    /// The completion API to use.
    pub completion: CompletionConfig,
    /// Optional overrides for the default sampling parameters.
    #[serde(default)]
    pub sampling: SamplingOverrides,
    /// Optional spreadsheet-backed audit sink.
    #[serde(default)]
    pub log_sink: Option<LogSinkConfig>,
    /// Optional local JSON append-log path.
    #[serde(default)]
    pub json_log_path: Option<String>,
}

fn default_port() -> u16 {
    9090
}
fn default_request_timeout_secs() -> u64 {
    60
}
fn default_max_prompt_words() -> usize {
    6000
}
fn default_max_context_words() -> usize {
    2000
}
fn default_include_page_markers() -> bool {
    true
}

/// Which hosted completion API to talk to and how.
#[derive(Debug, Deserialize, Clone)]
pub struct CompletionConfig {
    /// The provider kind: "openai" or "gemini".
    pub provider: String,
    /// The API URL. Optional for Gemini, where it can be derived from the
    /// model name.
    pub api_url: Option<String>,
    /// The API key. Required for hosted providers; absence is surfaced as a
    /// fatal configuration error when the provider is built.
    pub api_key: Option<String>,
    pub model: String,
}

/// Partial sampling overrides; anything unset keeps the library default.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SamplingOverrides {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
}

/// The spreadsheet append endpoint for the interaction log.
#[derive(Debug, Deserialize, Clone)]
pub struct LogSinkConfig {
    pub api_url: String,
    pub api_key: Option<String>,
}

impl AppConfig {
    /// Resolves the effective sampling parameters: library defaults, the
    /// configured model name, then any explicit overrides.
    pub fn sampling_config(&self) -> SamplingConfig {
        let mut sampling = SamplingConfig {
            model: self.completion.model.clone(),
            ..SamplingConfig::default()
        };
        if let Some(v) = self.sampling.max_tokens {
            sampling.max_tokens = v;
        }
        if let Some(v) = self.sampling.temperature {
            sampling.temperature = v;
        }
        if let Some(v) = self.sampling.top_p {
            sampling.top_p = v;
        }
        if let Some(v) = self.sampling.frequency_penalty {
            sampling.frequency_penalty = v;
        }
        if let Some(v) = self.sampling.presence_penalty {
            sampling.presence_penalty = v;
        }
        sampling
    }
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").unwrap();
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_else(|_| "".to_string())
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// - Top-level keys like `port` are overridden by `PORT`-style env vars.
/// - Nested keys are overridden by `RFPNAV_...` variables
///   (e.g. `RFPNAV_COMPLETION__API_KEY`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let config_path = match config_path_override {
        Some(path) => path.to_string(),
        None => {
            let base_path = env!("CARGO_MANIFEST_DIR");
            format!("{base_path}/config.yml")
        }
    };

    let content = read_and_substitute(&config_path)?.ok_or_else(|| {
        ConfigError::NotFound(format!("Config file not found at '{config_path}'."))
    })?;
    info!("Loading configuration from '{config_path}'.");

    let settings = ConfigBuilder::builder()
        .add_source(File::from_str(&content, FileFormat::Yaml))
        .add_source(Environment::default())
        .add_source(
            Environment::with_prefix("RFPNAV")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // `${VAR}` substitution turns an unset variable into an empty string;
    // normalize those to absent so handlers see one kind of "missing".
    if config
        .completion
        .api_key
        .as_deref()
        .is_some_and(|k| k.is_empty())
    {
        config.completion.api_key = None;
    }
    if let Some(sink) = &config.log_sink {
        if sink.api_url.is_empty() {
            config.log_sink = None;
        }
    }

    Ok(config)
}
