//! Error types for the journey generation pipeline.

use crate::planner::TimeWindow;
use chrono::NaiveDate;
use thiserror::Error;

/// Failures of a single call to the text-generation service.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Provider returned an empty completion")]
    EmptyCompletion,

    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
}

/// Structural failures of a chunk response.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Response is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Response does not match the journey schema: {0}")]
    Schema(#[source] serde_json::Error),

    #[error("Day {date} lies outside the requested window {window}")]
    DateOutsideWindow { date: NaiveDate, window: TimeWindow },
}

/// Top-level pipeline and CLI errors.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Missing credential: set {env_var} or provider.api_key in the configuration")]
    MissingCredential { env_var: String },

    #[error("Generation failed for window {window}: {source}")]
    GenerationFailed {
        window: TimeWindow,
        #[source]
        source: ProviderError,
    },

    #[error("Failed to parse model output for window {window}: {source}")]
    ParseFailed {
        window: TimeWindow,
        raw: String,
        #[source]
        source: ParseError,
    },

    #[error("Failed to persist journey to {path}: {reason}")]
    PersistFailed { path: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
