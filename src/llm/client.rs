use super::error::BackendError;
use super::types::{LLMRequest, LLMResponse};
use async_trait::async_trait;

/// A single request/response boundary to a text-generation service.
///
/// Implementations return the concatenated text output of one call. Retry
/// policy, authentication and model selection are the implementation's
/// concern; callers treat any error as fatal for that call.
#[async_trait]
pub trait LLMClient: Send + Sync {
    async fn chat(&self, request: LLMRequest) -> Result<LLMResponse, BackendError>;

    fn name(&self) -> &str;

    fn model_info(&self) -> Option<String> {
        None
    }
}
