//! Workspace initialization
//!
//! `journeygen init` writes an editable `config/config.toml` and copies the
//! embedded prompt files into `prompts/`, with the config pointing at them.

use crate::config::{ConfigLoader, JourneyConfig};
use crate::error::ApiError;
use crate::prompt::DEFAULT_PROMPTS;
use std::path::{Path, PathBuf};

const PROMPTS_DIR: &str = "prompts";

/// Result of initialization operation
#[derive(Debug, Clone, Default)]
pub struct InitResult {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
    pub errors: Vec<String>,
}

/// Summary of initialization operations
#[derive(Debug, Clone)]
pub struct InitSummary {
    pub workspace_root: PathBuf,
    pub prompts: InitResult,
    pub config: InitResult,
}

/// Preview of what would be initialized
#[derive(Debug, Clone)]
pub struct InitPreview {
    pub prompts: Vec<String>,
    pub config: Option<String>,
}

/// The configuration `init` writes: defaults, with prompt paths pointing into the workspace.
pub fn workspace_config() -> JourneyConfig {
    let mut config = JourneyConfig::default();
    config.prompt.system_prompt_path = Some(Path::new(PROMPTS_DIR).join("system.md"));
    config.prompt.base_prompt_path = Some(Path::new(PROMPTS_DIR).join("base.md"));
    config.prompt.opening_context_path = Some(Path::new(PROMPTS_DIR).join("opening.md"));
    config
}

/// Copy the embedded prompts into `<workspace>/prompts/`
pub fn initialize_prompts(workspace_root: &Path, force: bool) -> Result<InitResult, ApiError> {
    let prompts_dir = workspace_root.join(PROMPTS_DIR);
    std::fs::create_dir_all(&prompts_dir)?;
    let mut result = InitResult::default();

    for (filename, content) in DEFAULT_PROMPTS {
        let prompt_path = prompts_dir.join(filename);

        if prompt_path.exists() && !force {
            result.skipped.push(filename.to_string());
            continue;
        }

        match std::fs::write(&prompt_path, *content) {
            Ok(_) => result.created.push(filename.to_string()),
            Err(e) => result.errors.push(format!(
                "Failed to write prompt file {}: {}",
                prompt_path.display(),
                e
            )),
        }
    }

    Ok(result)
}

/// Write `<workspace>/config/config.toml`
pub fn initialize_config(workspace_root: &Path, force: bool) -> Result<InitResult, ApiError> {
    let config_path = ConfigLoader::workspace_config_path(workspace_root);
    let mut result = InitResult::default();
    let label = config_path.display().to_string();

    if config_path.exists() && !force {
        result.skipped.push(label);
        return Ok(result);
    }

    let toml_content = toml::to_string_pretty(&workspace_config())
        .map_err(|e| ApiError::ConfigError(format!("Failed to serialize config: {}", e)))?;

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    match std::fs::write(&config_path, toml_content) {
        Ok(_) => result.created.push(label),
        Err(e) => result.errors.push(format!("Failed to write {}: {}", label, e)),
    }
    Ok(result)
}

/// Initialize prompts and configuration
pub fn initialize_all(workspace_root: &Path, force: bool) -> Result<InitSummary, ApiError> {
    let prompts = initialize_prompts(workspace_root, force)?;
    let config = initialize_config(workspace_root, force)?;
    Ok(InitSummary {
        workspace_root: workspace_root.to_path_buf(),
        prompts,
        config,
    })
}

/// List what would be initialized without actually creating files
pub fn list_initialization(workspace_root: &Path) -> InitPreview {
    let prompts_dir = workspace_root.join(PROMPTS_DIR);
    let prompts = DEFAULT_PROMPTS
        .iter()
        .filter(|(filename, _)| !prompts_dir.join(filename).exists())
        .map(|(filename, _)| filename.to_string())
        .collect();
    let config_path = ConfigLoader::workspace_config_path(workspace_root);
    let config = (!config_path.exists()).then(|| config_path.display().to_string());
    InitPreview { prompts, config }
}
