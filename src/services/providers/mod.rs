/// Generative model provider abstraction
///
/// The suggestion service only needs "prompt + output schema in, text out".
/// Each provider owns its transport, authentication and envelope format.
use crate::error::AppResult;

pub mod gemini;

pub use gemini::GeminiProvider;

/// One structured-output request to a generative model
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// JSON schema the model's output should follow
    pub response_schema: serde_json::Value,
}

/// Trait for generative model providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Issues exactly one request and returns the raw response text
    ///
    /// `Ok(None)` means the call succeeded but the model returned no text.
    /// Transport failures, non-success statuses and unreadable envelopes are
    /// errors. No retries.
    async fn generate(&self, request: &GenerationRequest) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
