//! Conversion assistant
//!
//! Sends a free-text conversion question to a language model and returns its
//! explanation. Every failure mode is a typed `AssistantError`; nothing here
//! touches the conversion engine or the history.

pub mod gemini;
pub mod prompt;

use async_trait::async_trait;
use serde::Serialize;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

pub use gemini::GeminiClient;

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum AssistantError {
    #[error("Gemini API key is not configured (set GEMINI_API_KEY)")]
    MissingApiKey,

    #[error("Please enter a conversion query")]
    EmptyQuery,

    /// Transport failure, timeout, or a non-success HTTP status.
    #[error("Assistant unavailable{}: {reason}", status_suffix(.status))]
    ServiceUnavailable { status: Option<u16>, reason: String },

    /// The service answered but the body could not be used.
    #[error("Malformed assistant response: {0}")]
    MalformedResponse(String),

    #[error("Assistant configuration error: {0}")]
    Configuration(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

// ============================================================================
// Client seam
// ============================================================================

/// A text-in, text-out language model.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError>;

    fn model(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssistantConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssistantAnswer {
    pub query: String,
    pub text: String,
    pub model: String,
    pub latency_ms: u128,
}

pub struct Assistant {
    client: Box<dyn LlmClient>,
    timeout: Duration,
}

impl Assistant {
    pub fn new(client: Box<dyn LlmClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Build a Gemini-backed assistant. Fails without an API key.
    pub fn from_config(config: &AssistantConfig) -> Result<Self, AssistantError> {
        let client = GeminiClient::from_config(config)?;
        Ok(Self::new(Box::new(client), config.timeout))
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    pub async fn ask(&self, query: &str) -> Result<AssistantAnswer, AssistantError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AssistantError::EmptyQuery);
        }

        let prompt = prompt::conversion_prompt(query);
        let started = Instant::now();

        let text = tokio::time::timeout(self.timeout, self.client.generate(&prompt))
            .await
            .map_err(|_| {
                warn!(timeout = ?self.timeout, "assistant request timed out");
                AssistantError::ServiceUnavailable {
                    status: None,
                    reason: format!("no answer within {:?}", self.timeout),
                }
            })??;

        let text = text.trim();
        if text.is_empty() {
            return Err(AssistantError::MalformedResponse(
                "No response from Gemini API".to_string(),
            ));
        }

        let latency_ms = started.elapsed().as_millis();
        info!(model = %self.client.model(), latency_ms, "assistant answered");

        Ok(AssistantAnswer {
            query: query.to_string(),
            text: text.to_string(),
            model: self.client.model().to_string(),
            latency_ms,
        })
    }
}
