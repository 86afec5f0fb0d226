//! Generation Client: one bounded completion per chunk.

use crate::error::ProviderError;
use crate::provider::{ChatMessage, CompletionOptions, ModelProviderClient};
use tracing::{debug, info, warn};

/// Wraps a provider with the fixed system prompt and sampling temperature.
///
/// Every failure of the underlying call comes back as an `Err`; there is no retry.
pub struct GenerationClient<C> {
    provider: C,
    system_prompt: String,
    temperature: f32,
}

impl<C: ModelProviderClient> GenerationClient<C> {
    pub fn new(provider: C, system_prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            provider,
            system_prompt: system_prompt.into(),
            temperature,
        }
    }

    pub fn provider(&self) -> &C {
        &self.provider
    }

    /// Send `prompt` and return the raw completion text.
    ///
    /// A blank completion counts as no output.
    pub async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, ProviderError> {
        info!(
            provider = self.provider.provider_name(),
            model = self.provider.model_name(),
            prompt_chars = prompt.len(),
            max_tokens,
            "Sending generation request"
        );

        let messages = vec![
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(prompt),
        ];
        let options = CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(max_tokens),
        };

        let response = self.provider.complete(messages, options).await.map_err(|e| {
            warn!(error = %e, "Generation request failed");
            e
        })?;

        debug!(
            completion_tokens = response.usage.completion_tokens,
            finish_reason = response.finish_reason.as_deref().unwrap_or("unknown"),
            "Generation response received"
        );
        if response.finish_reason.as_deref() == Some("length") {
            warn!(max_tokens, "Completion hit the output token ceiling; output is likely truncated");
        }

        if response.content.trim().is_empty() {
            return Err(ProviderError::EmptyCompletion);
        }
        Ok(response.content)
    }
}
