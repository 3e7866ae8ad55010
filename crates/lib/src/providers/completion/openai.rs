use crate::{
    errors::NavigatorError,
    providers::completion::{ChatMessage, CompletionProvider, SamplingConfig},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    messages: Vec<ChatMessage>,
    model: &'a str,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize, Debug)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize, Debug)]
struct OpenAiResponseMessage {
    content: String,
}

// --- OpenAI Provider implementation ---

/// A provider for OpenAI and OpenAI-compatible chat completion APIs.
///
/// One synchronous request per call, bounded by the client timeout, with no
/// retry: a timeout or transport failure is reported to the caller as a
/// `CompletionRequest` error.
#[derive(Clone, Debug)]
pub struct OpenAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
}

impl OpenAiProvider {
    /// Creates a new `OpenAiProvider` with a fixed request timeout.
    pub fn new(
        api_url: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, NavigatorError> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
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
impl CompletionProvider for OpenAiProvider {
    async fn complete(
        &self,
        system_prompt: &str,
        context: &[ChatMessage],
        user_prompt: &str,
        sampling: &SamplingConfig,
    ) -> Result<String, NavigatorError> {
        let mut messages = Vec::with_capacity(context.len() + 2);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend_from_slice(context);
        messages.push(ChatMessage::user(user_prompt));

        let request_body = OpenAiRequest {
            messages,
            model: &sampling.model,
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
            top_p: sampling.top_p,
            frequency_penalty: sampling.frequency_penalty,
            presence_penalty: sampling.presence_penalty,
            stream: false,
        };

        let mut request_builder = self.client.post(&self.api_url);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .json(&request_body)
            .send()
            .await
            .map_err(NavigatorError::CompletionRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(NavigatorError::CompletionApi(error_text));
        }

        let openai_response: OpenAiResponse = response
            .json()
            .await
            .map_err(NavigatorError::CompletionDeserialization)?;

        let raw_response = openai_response
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(raw_response.trim().to_string())
    }
}
