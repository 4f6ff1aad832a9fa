//! Merge rules: defaults, override order, conflict handling.
//!
//! Later sources win key by key; tables are merged, not replaced.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("provider.model", "gpt-4o-mini")?
        .set_default("provider.api_key_env", "OPENAI_API_KEY")?
        .set_default("provider.temperature", 0.7)?
        .set_default("provider.connect_timeout_secs", 10)?
        .set_default("provider.request_timeout_secs", 120)?
        .set_default("retry.max_retry_attempts", 2)?
        .set_default("retry.retry_delay_ms", 1000)?
        .set_default("pipeline.strict_references", true)?
        .set_default("pipeline.audit", true)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
