//! Generation service client.
//!
//! The pipeline talks to the language model through the [`TextGenerator`]
//! trait so tests and alternative backends can stand in for the network.
//! [`GeminiClient`] is the production implementation over the Gemini
//! `generateContent` REST endpoint.

use crate::error::SuggestError;
use crate::types::SuggestConfig;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// A service that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for `prompt`, optionally steered by a system instruction.
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
    ) -> Result<String, SuggestError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Gemini REST client.
#[derive(Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client for `model` at `base_url`.
    pub fn new<K, M, U>(
        api_key: K,
        model: M,
        base_url: U,
        timeout: Duration,
    ) -> Result<Self, SuggestError>
    where
        K: Into<String>,
        M: Into<String>,
        U: Into<String>,
    {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SuggestError::config("Gemini API key is empty"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SuggestError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            timeout,
        })
    }

    /// Create a client from pipeline configuration.
    pub fn from_config<K: Into<String>>(
        config: &SuggestConfig,
        api_key: K,
    ) -> Result<Self, SuggestError> {
        Self::new(
            api_key,
            config.model.clone(),
            config.api_base_url.clone(),
            config.generation_timeout,
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        system_instruction: Option<&str>,
    ) -> Result<String, SuggestError> {
        let body = GenerateRequest {
            system_instruction: system_instruction.map(|text| Content {
                role: None,
                parts: vec![Part { text }],
            }),
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending generation request");

        // Key goes in a header so it never shows up in URL-bearing errors.
        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SuggestError::timeout("generation request", self.timeout)
                } else {
                    SuggestError::generation(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SuggestError::rate_limited(
                "gemini",
                "quota or rate limit exceeded",
            ));
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(200).collect();
            return Err(SuggestError::generation_with_status(
                format!("service returned {}: {}", status, snippet),
                status.as_u16(),
            ));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| SuggestError::parse(format!("unexpected response body: {}", e)))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(SuggestError::generation("service returned no text"));
        }

        debug!(response_len = text.len(), "Received generation response");
        Ok(text.trim().to_string())
    }
}
