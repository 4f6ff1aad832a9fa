//! Completion Gateway
//!
//! Sends one (system instruction, user prompt) pair to a generation backend
//! running in JSON-object mode and returns the raw text. Backend failures are
//! returned as `ApiError` and never swallowed here. The client is constructed
//! explicitly and handed to the pipeline, so tests substitute a scripted one.

use crate::error::ApiError;
use async_trait::async_trait;

pub mod openai;
pub mod profile;
pub mod retry;
pub mod scripted;

pub use openai::OpenAIGateway;
pub use profile::ProviderConfig;
pub use retry::{RetryConfig, RetryingGateway};
pub use scripted::{RecordedCall, ScriptedGateway};

/// Text completion in structured-output mode.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Run one completion. The returned text is expected, not guaranteed, to
    /// be a JSON object; callers parse and check it.
    async fn complete(&self, system_instruction: &str, user_prompt: &str)
        -> Result<String, ApiError>;

    /// Short name used in logs.
    fn gateway_name(&self) -> &str;
}

#[async_trait]
impl<G: CompletionGateway + ?Sized> CompletionGateway for Box<G> {
    async fn complete(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String, ApiError> {
        (**self).complete(system_instruction, user_prompt).await
    }

    fn gateway_name(&self) -> &str {
        (**self).gateway_name()
    }
}

/// Build the production gateway stack from configuration: bounded retries
/// over the HTTP client.
pub fn build_gateway(
    provider: &ProviderConfig,
    retry: &RetryConfig,
) -> Result<Box<dyn CompletionGateway>, ApiError> {
    let client = OpenAIGateway::from_config(provider)?;
    Ok(Box::new(RetryingGateway::new(client, retry.clone())))
}
