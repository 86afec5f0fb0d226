//! Shared test utilities for integration tests
//!
//! Provides a scripted model provider, environment isolation, and builders for
//! chunk responses so each scenario reads as a sequence of model outputs.

use async_trait::async_trait;
use journeygen::error::ProviderError;
use journeygen::provider::{
    ChatMessage, CompletionOptions, CompletionResponse, MessageRole, ModelProviderClient,
    TokenUsage,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Global mutex to serialize environment variable access across all tests
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ISOLATED_VARS: &[&str] = &[
    "HOME",
    "XDG_CONFIG_HOME",
    "JOURNEYGEN_ENV",
    "OPENROUTER_API_KEY",
    "JOURNEYGEN__HORIZON__MONTHS",
    "JOURNEYGEN__HORIZON__START_DATE",
    "JOURNEYGEN__PROVIDER__MODEL",
    "JOURNEYGEN__PIPELINE__COOLDOWN_SECS",
];

/// Environment variable state to restore after test
struct EnvState {
    vars: Vec<(&'static str, Option<String>)>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            vars: ISOLATED_VARS
                .iter()
                .map(|name| (*name, std::env::var(name).ok()))
                .collect(),
        }
    }

    fn restore(self) {
        for (name, value) in self.vars {
            match value {
                Some(v) => std::env::set_var(name, v),
                None => std::env::remove_var(name),
            }
        }
    }
}

/// Run `f` with HOME and XDG_CONFIG_HOME pointed into `test_dir` and every
/// journeygen variable cleared. The original environment is restored afterwards.
pub fn with_isolated_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    for name in ISOLATED_VARS {
        std::env::remove_var(name);
    }
    std::env::set_var("HOME", test_dir.path().join("home"));
    std::env::set_var("XDG_CONFIG_HOME", test_dir.path().join("xdg"));

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
    env_state.restore();
    match result {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

/// Provider that replays scripted outputs and records the user prompt of each call.
#[derive(Clone)]
pub struct ScriptedProvider {
    responses: Arc<Mutex<VecDeque<Result<String, ProviderError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelProviderClient for ScriptedProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        _options: CompletionOptions,
    ) -> Result<CompletionResponse, ProviderError> {
        let prompt = messages
            .iter()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt);

        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::RequestFailed("script exhausted".to_string())));
        next.map(|content| CompletionResponse {
            content,
            model: "scripted".to_string(),
            usage: TokenUsage::default(),
            finish_reason: Some("stop".to_string()),
        })
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// One day record as the model would emit it.
pub fn day_json(date: &str, event_title: Option<&str>, message: &str) -> String {
    let events = event_title
        .map(|title| {
            format!(
                r#"{{"type":"DIAGNOSTIC","title":"{title}","details":"Follow-up planned","triggeredByMessageId":"msg_{date}"}}"#
            )
        })
        .unwrap_or_default();
    format!(
        r#"{{"date":"{date}","dayOfWeek":"Monday","month":"August","summary":"Routine day","events":[{events}],"messages":[{{"id":"msg_{date}","timestamp":"08:30 AM","sender":"Rohan Patel","text":"{message}"}}],"internalMetrics":{{"sleepHours":7}}}}"#
    )
}

/// A chunk response wrapping `days` in the `journey` field.
pub fn chunk_json(days: &[String]) -> String {
    format!(r#"{{"journey":[{}]}}"#, days.join(","))
}
