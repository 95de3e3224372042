//! Gemini `generateContent` client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error};

use super::{AssistantConfig, AssistantError, LlmClient};

// -- Wire types --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// -- Client --

/// The key travels in a header so it never appears in a request URL.
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    temperature: Option<f32>,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AssistantError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AssistantError::Configuration(format!("HTTP client: {}", e)))?;
        let endpoint: String = endpoint.into();

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            temperature: None,
        })
    }

    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AssistantError::MissingApiKey)?;

        let mut client = Self::new(api_key, &config.model, &config.endpoint, config.timeout)?;
        client.temperature = config.temperature;
        Ok(client)
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// Pull `candidates[0].content.parts[*].text` out of a response body.
    fn extract_text(body: &str) -> Result<String, AssistantError> {
        let response: GenerateResponse = serde_json::from_str(body)
            .map_err(|e| AssistantError::MalformedResponse(format!("invalid JSON: {}", e)))?;

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AssistantError::MalformedResponse("no candidates".to_string()))?;

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AssistantError::MalformedResponse(
                "No response from Gemini API".to_string(),
            ));
        }
        Ok(text)
    }

    /// Prefer the API's own error message over the raw body.
    fn error_reason(body: &str) -> String {
        serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.chars().take(200).collect())
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: self.temperature.map(|temperature| GenerationConfig { temperature }),
        };

        debug!(model = %self.model, "sending generateContent request");

        let response = self
            .client
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!(error = %e, timeout = e.is_timeout(), "Gemini request failed");
                AssistantError::ServiceUnavailable {
                    status: e.status().map(|s| s.as_u16()),
                    reason: if e.is_timeout() {
                        "request timed out".to_string()
                    } else {
                        "connection failed".to_string()
                    },
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e.without_url(), "failed to read Gemini response body");
            AssistantError::ServiceUnavailable {
                status: Some(status.as_u16()),
                reason: "failed to read response body".to_string(),
            }
        })?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(AssistantError::ServiceUnavailable {
                status: Some(status.as_u16()),
                reason: Self::error_reason(&body),
            });
        }

        Self::extract_text(&body)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// The API key must never end up in logs
impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
