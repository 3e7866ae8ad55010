use crate::{
    errors::NavigatorError,
    providers::completion::{ChatMessage, CompletionProvider, SamplingConfig},
};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;

// --- Gemini-specific request and response structures ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: Content,
    contents: Vec<RoleContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct RoleContent {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: ContentResponse,
}

#[derive(Deserialize, Debug)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize, Debug)]
struct PartResponse {
    text: String,
}

// --- Gemini Provider implementation ---

/// A provider for the Google Gemini `generateContent` API.
#[derive(Clone, Debug)]
pub struct GeminiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
}

impl GeminiProvider {
    /// Creates a new `GeminiProvider` with a fixed request timeout.
    pub fn new(
        api_url: String,
        api_key: String,
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

/// Maps our role names onto Gemini's. Gemini has no "system" content role;
/// the system prompt travels in `system_instruction` instead.
fn gemini_role(role: &str) -> String {
    match role {
        "assistant" => "model".to_string(),
        other => other.to_string(),
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(
        &self,
        system_prompt: &str,
        context: &[ChatMessage],
        user_prompt: &str,
        sampling: &SamplingConfig,
    ) -> Result<String, NavigatorError> {
        let mut contents: Vec<RoleContent> = context
            .iter()
            .map(|m| RoleContent {
                role: gemini_role(&m.role),
                parts: vec![Part {
                    text: m.content.clone(),
                }],
            })
            .collect();
        contents.push(RoleContent {
            role: "user".to_string(),
            parts: vec![Part {
                text: user_prompt.to_string(),
            }],
        });

        let request_body = GeminiRequest {
            system_instruction: Content {
                parts: vec![Part {
                    text: system_prompt.to_string(),
                }],
            },
            contents,
            generation_config: GenerationConfig {
                temperature: sampling.temperature,
                top_p: sampling.top_p,
                max_output_tokens: sampling.max_tokens,
            },
        };

        let response = self
            .client
            .post(&self.api_url)
            .query(&[("key", &self.api_key)])
            .json(&request_body)
            .send()
            .await
            .map_err(NavigatorError::CompletionRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(NavigatorError::CompletionApi(error_text));
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(NavigatorError::CompletionDeserialization)?;

        let raw_response = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .unwrap_or_default();

        Ok(raw_response.trim().to_string())
    }
}
