//! Scripted gateway: replays canned replies in order and records every call.

use super::CompletionGateway;
use crate::error::ApiError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// One request seen by a [`ScriptedGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub system_instruction: String,
    pub user_prompt: String,
}

#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, ApiError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let gateway = Self::new();
        for response in responses {
            gateway.push_response(response);
        }
        gateway
    }

    pub fn push_response(&self, response: impl Into<String>) {
        self.replies.lock().push_back(Ok(response.into()));
    }

    pub fn push_error(&self, error: ApiError) {
        self.replies.lock().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait]
impl CompletionGateway for ScriptedGateway {
    async fn complete(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> Result<String, ApiError> {
        self.calls.lock().push(RecordedCall {
            system_instruction: system_instruction.to_string(),
            user_prompt: user_prompt.to_string(),
        });
        self.replies.lock().pop_front().unwrap_or_else(|| {
            Err(ApiError::GenerationUnavailable(
                "Scripted gateway has no reply left".to_string(),
            ))
        })
    }

    fn gateway_name(&self) -> &str {
        "scripted"
    }
}
