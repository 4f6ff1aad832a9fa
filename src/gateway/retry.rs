//! Bounded retries at the gateway boundary.
//!
//! Only transient failures are retried, with a fixed delay between attempts.
//! The pipeline itself never retries a stage.

use super::CompletionGateway;
use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt. Zero disables retrying.
    #[serde(default = "default_max_retry_attempts")]
    pub max_retry_attempts: usize,

    /// Delay between attempts (milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_max_retry_attempts() -> usize {
    2
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retry_attempts: default_max_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl RetryConfig {
    pub fn disabled() -> Self {
        Self {
            max_retry_attempts: 0,
            retry_delay_ms: 0,
        }
    }
}

pub struct RetryingGateway<G> {
    inner: G,
    config: RetryConfig,
}

impl<G: CompletionGateway> RetryingGateway<G> {
    pub fn new(inner: G, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: CompletionGateway> CompletionGateway for RetryingGateway<G> {
    async fn complete(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String, ApiError> {
        let mut retry_count = 0usize;
        loop {
            debug!(
                gateway = self.inner.gateway_name(),
                attempt = retry_count + 1,
                "Sending completion request"
            );
            match self.inner.complete(system_instruction, user_prompt).await {
                Ok(text) => return Ok(text),
                Err(err) if err.is_transient() && retry_count < self.config.max_retry_attempts => {
                    retry_count += 1;
                    warn!(
                        gateway = self.inner.gateway_name(),
                        retry_count,
                        error = %err,
                        "Completion request failed, retrying"
                    );
                    sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn gateway_name(&self) -> &str {
        self.inner.gateway_name()
    }
}
