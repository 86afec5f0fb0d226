//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Later sources override these key-by-key; tables are merged, not replaced.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("provider.model", crate::config::DEFAULT_MODEL)?
        .set_default("provider.endpoint", crate::config::DEFAULT_ENDPOINT)?
        .set_default("provider.api_key_env", crate::config::DEFAULT_API_KEY_ENV)?
        .set_default("horizon.start_date", "2025-08-01")?
        .set_default("horizon.months", 8)?
        .set_default("pipeline.output_path", crate::config::DEFAULT_OUTPUT_PATH)?
        .set_default("pipeline.cooldown_secs", 5)
}
