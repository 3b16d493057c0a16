//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for text-generation providers
///
/// One call produces one completion for one prompt. Implementations must not
/// retry: a failed call is reported to the caller as-is.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion for the given prompt
    ///
    /// # Arguments
    ///
    /// * `request` - The prompt and generation parameters
    ///
    /// # Returns
    ///
    /// The decoded provider response. A response that decodes but carries no
    /// generated text is still `Ok`; use [`CompletionResponse::text`] to check.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "gemini")
    fn name(&self) -> &'static str;
}
