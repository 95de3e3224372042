use std::time::Duration;

use crate::core::features::assistant::{Assistant, AssistantAnswer};
use crate::shared::error::AppResult;
use crate::shared::settings::AppSettings;
use crate::shared::types::AskResponse;

impl From<AssistantAnswer> for AskResponse {
    fn from(answer: AssistantAnswer) -> Self {
        Self {
            query: answer.query,
            answer: answer.text,
            model: answer.model,
            latency_ms: answer.latency_ms,
        }
    }
}

pub async fn ask(assistant: &Assistant, query: &str) -> AppResult<AskResponse> {
    Ok(assistant.ask(query).await?.into())
}

/// One-shot question with optional CLI overrides on top of the settings.
pub async fn run(
    settings: &AppSettings,
    query: &str,
    model: Option<String>,
    timeout_secs: Option<u64>,
    json: bool,
) -> AppResult<()> {
    let mut config = settings.assistant_config();
    if let Some(model) = model {
        config.model = model;
    }
    if let Some(secs) = timeout_secs {
        config.timeout = Duration::from_secs(secs.max(1));
    }

    let assistant = Assistant::from_config(&config)?;
    let response = ask(&assistant, query).await?;

    if json {
        super::print_json(&response)
    } else {
        println!("{}", response.answer);
        Ok(())
    }
}
