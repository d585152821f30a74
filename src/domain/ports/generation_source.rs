//! Driven port for the external text-generation endpoint.

use async_trait::async_trait;

use crate::domain::ChatMessage;

/// Errors raised by generation source adapters.
///
/// A timeout is a transient failure, not corruption: the call carries no
/// side effects on the project store, so the caller simply retries or gives
/// up without any state to repair.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationSourceError {
    /// The upstream endpoint did not answer within the deadline.
    #[error("generation request timed out")]
    Timeout,

    /// Transport failure or non-success status from the upstream endpoint.
    #[error("generation request failed: {message}")]
    Upstream { message: String },
}

impl GenerationSourceError {
    /// Create an upstream error with the given message.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait GenerationSource: Send + Sync {
    /// Forward the assembled messages and relay the raw text response.
    ///
    /// The response is passed through unmodified; this layer never parses it
    /// as JSON. Persistence of any resulting files happens only through an
    /// explicit subsequent save.
    async fn generate(
        &self,
        messages: &[ChatMessage],
        model: &str,
    ) -> Result<String, GenerationSourceError>;
}
