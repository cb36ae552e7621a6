//! Driven port for the external text-generation service.
//!
//! The domain owns the prompt pair and sampling parameters; adapters only
//! transport them and hand back the raw completion text.

use async_trait::async_trait;

use super::define_port_error;

/// One completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct TextGenerationRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Ask the service for a JSON object rather than free text.
    pub json_response: bool,
}

define_port_error! {
    /// Errors surfaced while calling the text-generation service.
    pub enum TextGenerationError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "text generation transport failed: {message}",
        /// The call exceeded its deadline.
        Timeout { message: String } =>
            "text generation timed out: {message}",
        /// The service answered with a non-success status.
        Status { status: u16, message: String } =>
            "text generation returned status {status}: {message}",
        /// The response envelope could not be decoded.
        Decode { message: String } =>
            "text generation response decode failed: {message}",
        /// The service returned no completion text.
        Empty =>
            "text generation returned no content",
        /// No service is configured.
        Disabled =>
            "text generation is not configured",
    }
}

/// Port for requesting one completion.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerationSource: Send + Sync {
    /// Return the completion text for `request`.
    async fn complete(&self, request: &TextGenerationRequest)
    -> Result<String, TextGenerationError>;
}

/// Source used when no service is configured; every call fails with
/// [`TextGenerationError::Disabled`] so callers take their fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledTextGenerationSource;

#[async_trait]
impl TextGenerationSource for DisabledTextGenerationSource {
    async fn complete(
        &self,
        _request: &TextGenerationRequest,
    ) -> Result<String, TextGenerationError> {
        Err(TextGenerationError::disabled())
    }
}
