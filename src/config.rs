//! Configuration System
//!
//! Layered configuration for a generation run: merge-policy defaults, the global
//! user file, workspace files, then `JOURNEYGEN__*` environment variables. The
//! result is validated once and handed around by reference; nothing here is
//! global state.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;

pub const DEFAULT_MODEL: &str = "meta-llama/llama-3.1-405b-instruct:free";
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_OUTPUT_PATH: &str = "data/journeyData.json";
pub const DEFAULT_REFERER: &str = "http://localhost:3000";
pub const DEFAULT_TITLE: &str = "Journey Data Generator";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JourneyConfig {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub horizon: HorizonConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub prompt: PromptConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Text-generation service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Inline credential; prefer `api_key_env`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable holding the credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Hard output ceiling per chunk
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Routing headers (HTTP-Referer, X-Title)
    #[serde(default = "default_referer", skip_serializing_if = "Option::is_none")]
    pub referer: Option<String>,

    #[serde(default = "default_title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_temperature() -> f32 {
    0.6
}

fn default_max_tokens() -> u32 {
    8000
}

fn default_referer() -> Option<String> {
    Some(DEFAULT_REFERER.to_string())
}

fn default_title() -> Option<String> {
    Some(DEFAULT_TITLE.to_string())
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            api_key: None,
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            referer: default_referer(),
            title: default_title(),
        }
    }
}

impl ProviderConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("Model cannot be empty".to_string());
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(format!("Endpoint must be an http(s) URL: {}", self.endpoint));
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than zero".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            ));
        }
        Ok(())
    }
}

/// The span to generate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizonConfig {
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,

    #[serde(default = "default_months")]
    pub months: u32,
}

fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 1).unwrap_or_default()
}

fn default_months() -> u32 {
    8
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            months: default_months(),
        }
    }
}

/// Driver behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Artifact path, relative to the workspace root unless absolute
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Pause after every chunk; a courtesy rate limit, not a retry backoff
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Characters of the last message carried into the next prompt
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,

    /// Reject chunks containing days outside their window
    #[serde(default = "default_true")]
    pub enforce_window_dates: bool,
}

fn default_output_path() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_PATH)
}

fn default_cooldown_secs() -> u64 {
    5
}

fn default_preview_chars() -> usize {
    100
}

fn default_true() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            cooldown_secs: default_cooldown_secs(),
            preview_chars: default_preview_chars(),
            enforce_window_dates: default_true(),
        }
    }
}

/// Prompt template overrides; unset fields fall back to the embedded defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_prompt_path: Option<PathBuf>,

    /// File holding the context given to the first chunk
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_context_path: Option<PathBuf>,

    /// Inline context for the first chunk; wins over `opening_context_path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_context: Option<String>,
}

/// Configuration validation errors
#[derive(Debug, Clone)]
pub enum ValidationError {
    Provider(String),
    Horizon(String),
    Pipeline(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Provider(msg) => write!(f, "Provider: {}", msg),
            ValidationError::Horizon(msg) => write!(f, "Horizon: {}", msg),
            ValidationError::Pipeline(msg) => write!(f, "Pipeline: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl JourneyConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.provider.validate() {
            errors.push(ValidationError::Provider(e));
        }
        if self.horizon.months == 0 {
            errors.push(ValidationError::Horizon(
                "months must be at least 1".to_string(),
            ));
        }
        if self.pipeline.output_path.as_os_str().is_empty() {
            errors.push(ValidationError::Pipeline(
                "output_path cannot be empty".to_string(),
            ));
        }
        if self.pipeline.preview_chars == 0 {
            errors.push(ValidationError::Pipeline(
                "preview_chars must be greater than zero".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold all problems into one `ConfigError`.
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }
}

/// Resolved, credential-bearing settings for the generation client.
///
/// Built once per run; a missing credential fails here, before any network call.
#[derive(Clone)]
pub struct GenerationSettings {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub referer: Option<String>,
    pub title: Option<String>,
}

impl std::fmt::Debug for GenerationSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl GenerationSettings {
    pub fn resolve(provider: &ProviderConfig) -> Result<Self, ApiError> {
        let api_key = provider
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                std::env::var(&provider.api_key_env)
                    .ok()
                    .filter(|key| !key.trim().is_empty())
            })
            .ok_or_else(|| ApiError::MissingCredential {
                env_var: provider.api_key_env.clone(),
            })?;

        Ok(Self {
            api_key,
            model: provider.model.clone(),
            endpoint: provider.endpoint.clone(),
            max_tokens: provider.max_tokens,
            temperature: provider.temperature,
            referer: provider.referer.clone(),
            title: provider.title.clone(),
        })
    }
}
