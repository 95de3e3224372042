use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, warn};

use crate::core::features::assistant::AssistantConfig;
use crate::shared::error::{AppError, AppResult};

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RESULT_DECIMALS: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub api_keys: ApiKeys,
    pub assistant: AssistantSettings,
    pub preferences: UserPreferences,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKeys {
    pub gemini_api_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSettings {
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub result_decimals: usize,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            result_decimals: DEFAULT_RESULT_DECIMALS,
        }
    }
}

impl AppSettings {
    pub fn settings_path() -> AppResult<PathBuf> {
        ProjectDirs::from("com", "unit-converter", "unit-converter")
            .map(|dirs| dirs.config_dir().join("settings.json"))
            .ok_or_else(|| AppError::Config("Failed to determine config directory".to_string()))
    }

    /// Load from an explicit path or the platform config dir, then apply
    /// environment overrides. A missing or unreadable file yields defaults.
    pub async fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::settings_path()
                .map_err(|e| warn!(error = %e, "no config directory, using defaults"))
                .ok(),
        };

        let mut settings = match path {
            Some(path) => Self::load_from(&path).await.unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "failed to load settings, using defaults");
                Self::default()
            }),
            None => Self::default(),
        };

        settings.apply_overrides_from(|key| std::env::var(key).ok());
        settings
    }

    /// Read settings from `path`, writing defaults there on first run.
    pub async fn load_from(path: &Path) -> AppResult<Self> {
        if !fs::try_exists(path).await? {
            debug!(path = %path.display(), "settings file missing, writing defaults");
            let settings = Self::default();
            settings.save_to(path).await?;
            return Ok(settings);
        }

        let content = fs::read_to_string(path).await?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("Failed to parse settings: {}", e)))
    }

    pub async fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Environment wins over the file. `lookup` is `std::env::var` outside tests.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.api_keys.gemini_api_key = key;
        }
        if let Some(model) = lookup("UNIT_CONVERTER_MODEL") {
            self.assistant.model = model;
        }
        if let Some(endpoint) = lookup("UNIT_CONVERTER_LLM_ENDPOINT") {
            self.assistant.endpoint = endpoint;
        }
        if let Some(raw) = lookup("UNIT_CONVERTER_LLM_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.assistant.timeout_secs = secs,
                _ => warn!(value = %raw, "ignoring invalid UNIT_CONVERTER_LLM_TIMEOUT_SECS"),
            }
        }
    }

    pub fn assistant_config(&self) -> AssistantConfig {
        let key = self.api_keys.gemini_api_key.trim();
        AssistantConfig {
            api_key: (!key.is_empty()).then(|| key.to_string()),
            model: self.assistant.model.clone(),
            endpoint: self.assistant.endpoint.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(self.assistant.timeout_secs.max(1)),
            temperature: self.assistant.temperature,
        }
    }
}
