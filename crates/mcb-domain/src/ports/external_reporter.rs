//! The external reporter capability port (C10's page-block sink).

use async_trait::async_trait;

use crate::error::Result;

/// A single typed block in the external page-block document model.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExternalBlock {
    /// Top-level heading.
    Heading1 {
        /// Block text.
        content: String,
    },
    /// Second-level heading.
    Heading2 {
        /// Block text.
        content: String,
    },
    /// Third-level heading.
    Heading3 {
        /// Block text.
        content: String,
    },
    /// Plain paragraph.
    Paragraph {
        /// Block text.
        content: String,
    },
    /// Bulleted list item.
    BulletedListItem {
        /// Block text.
        content: String,
    },
    /// Code block.
    Code {
        /// Block text.
        content: String,
        /// Language hint for syntax highlighting.
        language: String,
    },
    /// Visual divider; carries no text.
    Divider,
}

/// Capability for pushing a rendered block document to an external,
/// page-oriented reporting system.
#[async_trait]
pub trait ExternalReporter: Send + Sync {
    /// Push `blocks` to the configured external page.
    ///
    /// # Errors
    /// Returns [`crate::error::Error::ExternalReporterFailure`] if the
    /// remote API rejects any block (typically a length violation).
    async fn push_blocks(&self, blocks: &[ExternalBlock]) -> Result<()>;
}
