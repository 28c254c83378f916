//! TextGenerator trait for the free-text generation service.
//!
//! The pipeline never talks to a concrete model API. It sends a prompt,
//! gets free-form text back, and runs everything through the
//! structured-response parser. Implementations own transport concerns:
//! credentials, model selection, and the per-call timeout (the 10-55 s
//! range; the pipeline's caller budgets minutes for the whole run).

use async_trait::async_trait;

use crate::error::Result;

/// Abstraction over a free-text completion endpoint.
///
/// Implementations wrap a specific provider and must surface timeouts,
/// non-2xx responses, and aborts as [`crate::PipelineError::Generation`]
/// (or [`crate::PipelineError::Cancelled`]) so the retry wrapper can do
/// its job. No output schema is enforced here; all validation happens
/// downstream in [`crate::parse`].
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a prompt, return the raw completion text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for std::sync::Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.as_ref().complete(prompt).await
    }
}
