//! # Completion Providers
//!
//! A common interface for the hosted completion APIs the assistant can talk
//! to. One request in, one trimmed text response out; all failure modes
//! surface as [`NavigatorError`] variants and are never retried here — the
//! user re-triggers the action to retry.

pub mod gemini;
pub mod openai;

use crate::errors::NavigatorError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A role-tagged message in the request context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling parameters for one completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1024,
            temperature: 0.2,
            top_p: 1.0,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
        }
    }
}

impl SamplingConfig {
    /// Returns a copy with a different output-token cap. Free-form chat
    /// answers use a tighter cap than the canned document summaries.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// The output-token cap for free-form queries.
pub const QUERY_MAX_TOKENS: u32 = 300;

/// A trait for interacting with a hosted completion API.
///
/// `context` carries any prior conversation turns to include; callers are
/// responsible for windowing it (see `Session::context_window`). The returned
/// text is trimmed of leading and trailing whitespace.
#[async_trait]
pub trait CompletionProvider: Send + Sync + Debug + DynClone {
    async fn complete(
        &self,
        system_prompt: &str,
        context: &[ChatMessage],
        user_prompt: &str,
        sampling: &SamplingConfig,
    ) -> Result<String, NavigatorError>;
}

dyn_clone::clone_trait_object!(CompletionProvider);
