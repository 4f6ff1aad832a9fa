//! Configuration System
//!
//! Layered configuration: built-in defaults, the global file, workspace files
//! and `WHODUNIT__SECTION__KEY` environment overrides, later layers winning.
//! `validate` collects every problem instead of stopping at the first.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};

pub use crate::gateway::{ProviderConfig, RetryConfig};
pub use crate::logging::LoggingConfig;
pub use crate::pipeline::PipelineConfig;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::environment::PREFIX as ENV_PREFIX;
pub use sources::workspace_file::ENV_NAME_VAR;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WhodunitConfig {
    /// Generation backend
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Bounded retries for transient backend failures
    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Provider(String),
    Retry(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Provider(msg) => write!(f, "Provider: {}", msg),
            ValidationError::Retry(msg) => write!(f, "Retry: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

const MAX_RETRY_ATTEMPTS: usize = 10;
const MAX_RETRY_DELAY_MS: u64 = 60_000;

impl WhodunitConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.provider.validate() {
            errors.push(ValidationError::Provider(e));
        }

        if self.retry.max_retry_attempts > MAX_RETRY_ATTEMPTS {
            errors.push(ValidationError::Retry(format!(
                "max_retry_attempts must be at most {}, got {}",
                MAX_RETRY_ATTEMPTS, self.retry.max_retry_attempts
            )));
        }
        if self.retry.retry_delay_ms > MAX_RETRY_DELAY_MS {
            errors.push(ValidationError::Retry(format!(
                "retry_delay_ms must be at most {}, got {}",
                MAX_RETRY_DELAY_MS, self.retry.retry_delay_ms
            )));
        }

        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// `validate` folded into a single `ApiError::ConfigError`.
    pub fn ensure_valid(&self) -> Result<(), ApiError> {
        self.validate().map_err(|errors| {
            let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                error_msgs.join("\n")
            ))
        })
    }
}
