//! CLI parse: clap types for journeygen. No behavior; definitions only.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Journeygen CLI - Incremental narrative dataset generation
#[derive(Parser)]
#[command(name = "journeygen")]
#[command(about = "Generate a schema-constrained narrative dataset one half-month at a time")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Disable logging
    #[arg(long, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate every window of the horizon and write the journey
    Generate {
        /// First day of the horizon (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Number of calendar months to generate
        #[arg(long)]
        months: Option<u32>,
        /// Artifact path (relative to the workspace unless absolute)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Seconds to pause after each chunk
        #[arg(long)]
        cooldown_secs: Option<u64>,
        /// Model identifier
        #[arg(long)]
        model: Option<String>,
    },
    /// Print the planned windows without contacting the service
    Plan {
        /// First day of the horizon (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Number of calendar months to plan
        #[arg(long)]
        months: Option<u32>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Audit a previously written journey artifact
    Validate {
        /// Artifact path (defaults to the configured output path)
        path: Option<PathBuf>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Write an editable config and the default prompts into the workspace
    Init {
        /// Force re-initialization (overwrite existing)
        #[arg(long)]
        force: bool,

        /// List what would be initialized without creating
        #[arg(long)]
        list: bool,
    },
}

/// Command name string for log fields (e.g. "generate", "plan").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Generate { .. } => "generate",
        Commands::Plan { .. } => "plan",
        Commands::Validate { .. } => "validate",
        Commands::Init { .. } => "init",
    }
}
