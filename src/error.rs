//! Error types for the mystery generation pipeline.

use crate::types::Stage;
use thiserror::Error;

/// Backend, configuration and accumulator errors.
///
/// These are not caught by the stage functions: they propagate out of the
/// pipeline to the process boundary.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Generation unavailable: {0}")]
    GenerationUnavailable(String),

    #[error("Provider authentication failed: {0}")]
    ProviderAuthFailed(String),

    #[error("Provider rate limit exceeded: {0}")]
    ProviderRateLimit(String),

    #[error("Provider model not found: {0}")]
    ProviderModelNotFound(String),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Stage already recorded: {0}")]
    AlreadyRecorded(Stage),
}

impl ApiError {
    /// Whether a retry at the gateway boundary could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::GenerationUnavailable(_) => true,
            ApiError::ProviderRateLimit(_) => true,
            ApiError::ProviderError(_) => true,
            ApiError::ProviderAuthFailed(_) => false,
            ApiError::ProviderModelNotFound(_) => false,
            ApiError::ProviderNotConfigured(_) => false,
            ApiError::ConfigError(_) => false,
            ApiError::AlreadyRecorded(_) => false,
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// Why a stage produced no record. Caught at the parse point and reported;
/// the pipeline stops at the failing stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StageFailure {
    #[error("Failed to parse {stage} response: {reason}")]
    StructuredParse { stage: Stage, reason: String },

    #[error("{stage} response violates its schema: {}", violations.join("; "))]
    SchemaViolation {
        stage: Stage,
        violations: Vec<String>,
    },
}

impl StageFailure {
    pub fn stage(&self) -> Stage {
        match self {
            StageFailure::StructuredParse { stage, .. } => *stage,
            StageFailure::SchemaViolation { stage, .. } => *stage,
        }
    }
}

/// Result of one stage: either the parsed record or the reason it failed.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    Success(T),
    Failure(StageFailure),
}

impl<T> StageOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, StageOutcome::Success(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            StageOutcome::Success(record) => Some(record),
            StageOutcome::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&StageFailure> {
        match self {
            StageOutcome::Success(_) => None,
            StageOutcome::Failure(failure) => Some(failure),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> StageOutcome<U> {
        match self {
            StageOutcome::Success(record) => StageOutcome::Success(f(record)),
            StageOutcome::Failure(failure) => StageOutcome::Failure(failure),
        }
    }

    pub fn into_result(self) -> Result<T, StageFailure> {
        match self {
            StageOutcome::Success(record) => Ok(record),
            StageOutcome::Failure(failure) => Err(failure),
        }
    }
}
