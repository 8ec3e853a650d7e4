//! The LLM client capability port.
//!
//! All stages that call an LLM (the analysis-strategy hint, the analyzer
//! enhancer, the AI review) go through this single narrow trait so they can
//! degrade gracefully when the capability is unavailable, per the
//! "implicit dependency on an LLM being available" design note.

use async_trait::async_trait;

use crate::error::Result;

/// A capability for completing a single prompt against an LLM backend.
///
/// Implementations are responsible for their own request-level timeout;
/// callers additionally enforce a per-job total-LLM budget.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send `prompt` and return the raw text completion.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::LlmFailure`] on timeout, transport
    /// failure, or an empty/malformed upstream response.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// A short label identifying this backend (`"llm_a"`, `"llm_b"`), used
    /// in health reporting and log fields.
    fn label(&self) -> &'static str;
}
