//! Prompt template: fixed schema/persona text plus a per-chunk instruction.
//!
//! Defaults are embedded in the binary at build time; `init` copies them into the
//! workspace so they can be edited and pointed at from the configuration.

use crate::config::PromptConfig;
use crate::error::ApiError;
use crate::planner::TimeWindow;
use crate::summarizer::ContextDigest;
use std::path::Path;

pub const DEFAULT_SYSTEM_PROMPT: &str = include_str!("../prompts/system.md");
pub const DEFAULT_BASE_PROMPT: &str = include_str!("../prompts/base.md");
pub const DEFAULT_OPENING_CONTEXT: &str = include_str!("../prompts/opening.md");

/// Default prompts embedded in binary at compile time
pub const DEFAULT_PROMPTS: &[(&str, &str)] = &[
    ("system.md", DEFAULT_SYSTEM_PROMPT),
    ("base.md", DEFAULT_BASE_PROMPT),
    ("opening.md", DEFAULT_OPENING_CONTEXT),
];

const CHUNK_INSTRUCTION: &str = "\
**Current Task:**
Generate the JSON data ONLY for the period: **{period}**.

**Previous Context (read this to keep the story continuous):**
{context}

Your entire response MUST be the JSON object for this specific period, strictly following the schema.
";

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub system_prompt: String,
    pub base_prompt: String,
    pub opening_context: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.trim().to_string(),
            base_prompt: DEFAULT_BASE_PROMPT.trim().to_string(),
            opening_context: DEFAULT_OPENING_CONTEXT.trim().to_string(),
        }
    }
}

impl PromptTemplate {
    /// Apply configured overrides; relative paths resolve against `workspace_root`.
    pub fn from_config(config: &PromptConfig, workspace_root: &Path) -> Result<Self, ApiError> {
        let mut template = Self::default();
        if let Some(path) = &config.system_prompt_path {
            template.system_prompt = read_prompt(workspace_root, path)?;
        }
        if let Some(path) = &config.base_prompt_path {
            template.base_prompt = read_prompt(workspace_root, path)?;
        }
        if let Some(path) = &config.opening_context_path {
            template.opening_context = read_prompt(workspace_root, path)?;
        }
        if let Some(opening) = &config.opening_context {
            template.opening_context = opening.trim().to_string();
        }
        Ok(template)
    }

    /// Digest used before any chunk has been generated.
    pub fn opening_digest(&self) -> ContextDigest {
        ContextDigest::new(self.opening_context.clone())
    }

    /// Base prompt followed by the instruction for `window`, carrying `digest`.
    pub fn render(&self, window: &TimeWindow, digest: &ContextDigest) -> String {
        let instruction = CHUNK_INSTRUCTION
            .replace("{period}", &window.label())
            .replace("{context}", digest.as_str());
        format!("{}\n\n{}", self.base_prompt, instruction)
    }
}

fn read_prompt(workspace_root: &Path, path: &Path) -> Result<String, ApiError> {
    let resolved = if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace_root.join(path)
    };
    let content = std::fs::read_to_string(&resolved).map_err(|e| {
        ApiError::ConfigError(format!(
            "Failed to read prompt file {}: {}",
            resolved.display(),
            e
        ))
    })?;
    if content.trim().is_empty() {
        return Err(ApiError::ConfigError(format!(
            "Prompt file is empty: {}",
            resolved.display()
        )));
    }
    Ok(content.trim().to_string())
}
