//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::cli::parse::{command_name, Commands};
use crate::cli::presentation::{
    format_audit_json, format_audit_text, format_init_preview, format_init_summary,
    format_plan_json, format_plan_text, format_run_summary,
};
use crate::config::{ConfigLoader, JourneyConfig};
use crate::error::ApiError;
use crate::init;
use crate::journey::{load_artifact, JourneyAudit};
use crate::pipeline::JourneyPipeline;
use crate::planner::plan_windows;
use crate::prompt::PromptTemplate;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Runtime context for CLI execution: workspace root and the loaded configuration.
/// Built from workspace path and optional config path using ConfigLoader only.
pub struct RunContext {
    workspace_root: PathBuf,
    config: JourneyConfig,
}

impl RunContext {
    /// Create run context from workspace root and optional config path. Uses ConfigLoader only.
    pub fn new(workspace_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = if let Some(ref cfg_path) = config_path {
            ConfigLoader::load_from_file(cfg_path)?
        } else {
            ConfigLoader::load(&workspace_root)?
        };
        debug!(workspace = %workspace_root.display(), "Configuration loaded");
        Ok(Self {
            workspace_root,
            config,
        })
    }

    pub fn config(&self) -> &JourneyConfig {
        &self.config
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let name = command_name(command);
        info!(command = name, "Executing command");
        let result = match command {
            Commands::Generate {
                start,
                months,
                output,
                cooldown_secs,
                model,
            } => self.handle_generate(
                *start,
                *months,
                output.as_deref(),
                *cooldown_secs,
                model.as_deref(),
            ),
            Commands::Plan {
                start,
                months,
                format,
            } => self.handle_plan(*start, *months, format),
            Commands::Validate { path, format } => self.handle_validate(path.as_deref(), format),
            Commands::Init { force, list } => self.handle_init(*force, *list),
        };
        debug!(
            command = name,
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Command finished"
        );
        result
    }

    fn handle_generate(
        &self,
        start: Option<NaiveDate>,
        months: Option<u32>,
        output: Option<&Path>,
        cooldown_secs: Option<u64>,
        model: Option<&str>,
    ) -> Result<String, ApiError> {
        let mut config = self.config.clone();
        if let Some(start) = start {
            config.horizon.start_date = start;
        }
        if let Some(months) = months {
            config.horizon.months = months;
        }
        if let Some(output) = output {
            config.pipeline.output_path = output.to_path_buf();
        }
        if let Some(cooldown) = cooldown_secs {
            config.pipeline.cooldown_secs = cooldown;
        }
        if let Some(model) = model {
            config.provider.model = model.to_string();
        }
        config.ensure_valid()?;
        config.pipeline.output_path = self.resolve_path(&config.pipeline.output_path);

        let template = PromptTemplate::from_config(&config.prompt, &self.workspace_root)?;
        let mut pipeline = JourneyPipeline::from_config(&config, &template)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ApiError::ConfigError(format!("Failed to create runtime: {}", e)))?;
        let summary = runtime.block_on(pipeline.run(&config.horizon))?;
        Ok(format_run_summary(&summary))
    }

    fn handle_plan(
        &self,
        start: Option<NaiveDate>,
        months: Option<u32>,
        format: &str,
    ) -> Result<String, ApiError> {
        let start = start.unwrap_or(self.config.horizon.start_date);
        let months = months.unwrap_or(self.config.horizon.months);
        let windows = plan_windows(start, months);
        match format {
            "json" => format_plan_json(&windows),
            "text" => Ok(format_plan_text(&windows)),
            other => Err(invalid_format(other)),
        }
    }

    fn handle_validate(&self, path: Option<&Path>, format: &str) -> Result<String, ApiError> {
        let path = self.resolve_path(path.unwrap_or(&self.config.pipeline.output_path));
        let document = load_artifact(&path).map_err(|e| {
            ApiError::ConfigError(format!("Failed to load artifact {}: {}", path.display(), e))
        })?;
        let audit = JourneyAudit::of(&document.journey);
        info!(
            days = audit.total_days,
            clean = audit.is_clean(),
            "Audited journey artifact"
        );
        match format {
            "json" => format_audit_json(&path, &audit),
            "text" => Ok(format_audit_text(&path, &audit)),
            other => Err(invalid_format(other)),
        }
    }

    fn handle_init(&self, force: bool, list: bool) -> Result<String, ApiError> {
        if list {
            let preview = init::list_initialization(&self.workspace_root);
            return Ok(format_init_preview(&preview));
        }
        let summary = init::initialize_all(&self.workspace_root, force)?;
        Ok(format_init_summary(&summary, force))
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_root.join(path)
        }
    }
}

fn invalid_format(format: &str) -> ApiError {
    ApiError::ConfigError(format!(
        "Invalid format: {} (must be 'text' or 'json')",
        format
    ))
}
