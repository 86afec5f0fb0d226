//! Pipeline Driver
//!
//! Runs every planned window strictly in order. Each chunk's prompt depends on the
//! digest of the chunk before it, so the first hard failure ends the run and
//! nothing is written; only a fully successful horizon is persisted.

use crate::config::{GenerationSettings, HorizonConfig, JourneyConfig, PipelineConfig};
use crate::error::ApiError;
use crate::generation::GenerationClient;
use crate::journey::{Journey, JourneyAudit};
use crate::normalize::{check_window, parse_chunk};
use crate::planner::{plan_windows, TimeWindow};
use crate::prompt::PromptTemplate;
use crate::provider::{ModelProviderClient, OpenRouterClient};
use crate::summarizer::{summarize, ContextDigest};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Driver lifecycle. `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineState {
    Idle,
    Planning,
    Prompting,
    Generating,
    Parsing,
    Accumulating,
    Summarizing,
    Finalizing,
    Done,
    Failed,
}

/// Result of one successfully processed window.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkReport {
    pub index: usize,
    pub window: TimeWindow,
    pub days: usize,
    /// Parsed but produced no days
    pub weak_success: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub chunks: Vec<ChunkReport>,
    pub total_days: usize,
    pub output_path: PathBuf,
    pub audit: JourneyAudit,
}

impl RunSummary {
    pub fn weak_windows(&self) -> impl Iterator<Item = &TimeWindow> {
        self.chunks
            .iter()
            .filter(|chunk| chunk.weak_success)
            .map(|chunk| &chunk.window)
    }
}

pub struct JourneyPipeline<'a, C> {
    client: GenerationClient<C>,
    template: &'a PromptTemplate,
    config: &'a PipelineConfig,
    max_tokens: u32,
    state: PipelineState,
    journey: Journey,
}

impl<'a> JourneyPipeline<'a, OpenRouterClient> {
    /// Build the production pipeline. Fails on a missing credential before any network call.
    pub fn from_config(
        config: &'a JourneyConfig,
        template: &'a PromptTemplate,
    ) -> Result<Self, ApiError> {
        let settings = GenerationSettings::resolve(&config.provider)?;
        let provider = OpenRouterClient::new(&settings)
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        let client = GenerationClient::new(
            provider,
            template.system_prompt.clone(),
            settings.temperature,
        );
        Ok(Self::new(client, template, &config.pipeline, settings.max_tokens))
    }
}

impl<'a, C: ModelProviderClient> JourneyPipeline<'a, C> {
    pub fn new(
        client: GenerationClient<C>,
        template: &'a PromptTemplate,
        config: &'a PipelineConfig,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            template,
            config,
            max_tokens,
            state: PipelineState::Idle,
            journey: Journey::new(),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Days accumulated so far; after a failure this is what was discarded.
    pub fn journey(&self) -> &Journey {
        &self.journey
    }

    pub fn client(&self) -> &GenerationClient<C> {
        &self.client
    }

    /// Generate every window of `horizon` and persist the journey on success.
    pub async fn run(&mut self, horizon: &HorizonConfig) -> Result<RunSummary, ApiError> {
        match self.run_inner(horizon).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                self.transition(PipelineState::Failed);
                error!(error = %e, "Aborting generation; nothing was written");
                Err(e)
            }
        }
    }

    async fn run_inner(&mut self, horizon: &HorizonConfig) -> Result<RunSummary, ApiError> {
        self.transition(PipelineState::Planning);
        let windows = plan_windows(horizon.start_date, horizon.months);
        if windows.is_empty() {
            return Err(ApiError::ConfigError(
                "Horizon contains no windows; months must be at least 1".to_string(),
            ));
        }
        info!(
            start = %horizon.start_date,
            months = horizon.months,
            windows = windows.len(),
            "Planned generation windows"
        );

        let cooldown = Duration::from_secs(self.config.cooldown_secs);
        let mut digest = self.template.opening_digest();
        let mut chunks = Vec::with_capacity(windows.len());

        for (index, window) in windows.iter().enumerate() {
            let (report, next_digest) = self.run_chunk(index, windows.len(), window, &digest).await?;
            chunks.push(report);
            digest = next_digest;

            if !cooldown.is_zero() {
                debug!(seconds = cooldown.as_secs(), "Cooling down before next request");
                tokio::time::sleep(cooldown).await;
            }
        }

        self.transition(PipelineState::Finalizing);
        let audit = self.journey.audit();
        for id in &audit.duplicate_message_ids {
            warn!(message_id = %id, "Message id appears more than once in the journey");
        }
        for dangling in &audit.dangling_triggers {
            warn!(
                date = %dangling.date,
                title = %dangling.title,
                message_id = %dangling.message_id,
                "Event references a message id that does not exist"
            );
        }

        self.journey.persist(&self.config.output_path)?;
        self.transition(PipelineState::Done);
        info!(
            days = self.journey.len(),
            path = %self.config.output_path.display(),
            "Journey saved"
        );

        Ok(RunSummary {
            chunks,
            total_days: self.journey.len(),
            output_path: self.config.output_path.clone(),
            audit,
        })
    }

    async fn run_chunk(
        &mut self,
        index: usize,
        total: usize,
        window: &TimeWindow,
        digest: &ContextDigest,
    ) -> Result<(ChunkReport, ContextDigest), ApiError> {
        info!(chunk = index + 1, total, window = %window, "Generating data for {}", window.label());

        self.transition(PipelineState::Prompting);
        let prompt = self.template.render(window, digest);

        self.transition(PipelineState::Generating);
        let raw = self
            .client
            .generate(&prompt, self.max_tokens)
            .await
            .map_err(|source| ApiError::GenerationFailed {
                window: *window,
                source,
            })?;

        self.transition(PipelineState::Parsing);
        let parsed = parse_chunk(&raw).map_err(|source| ApiError::ParseFailed {
            window: *window,
            raw: raw.clone(),
            source,
        })?;
        if self.config.enforce_window_dates {
            check_window(&parsed.days, window).map_err(|source| ApiError::ParseFailed {
                window: *window,
                raw: raw.clone(),
                source,
            })?;
        }

        let weak_success = parsed.is_weak_success();
        let day_count = parsed.days.len();
        let next_digest = if weak_success {
            warn!(window = %window, "No 'journey' data found for this period");
            ContextDigest::fallback()
        } else {
            summarize(&parsed.days, self.config.preview_chars)
        };

        self.transition(PipelineState::Accumulating);
        self.journey.append(parsed.days);
        if !weak_success {
            info!(window = %window, days = day_count, "Parsed days for this period");
        }

        self.transition(PipelineState::Summarizing);
        debug!(digest = %next_digest, "Context for next chunk");

        Ok((
            ChunkReport {
                index,
                window: *window,
                days: day_count,
                weak_success,
            },
            next_digest,
        ))
    }

    fn transition(&mut self, next: PipelineState) {
        debug!(from = ?self.state, to = ?next, "Pipeline state transition");
        self.state = next;
    }
}
