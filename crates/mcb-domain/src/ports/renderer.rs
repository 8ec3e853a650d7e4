//! The report renderer port (C10).

use crate::entities::Job;
use crate::error::Result;
use crate::ports::external_reporter::ExternalBlock;

/// Output format requested of the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Full job object as a plain JSON tree.
    Json,
    /// Self-contained HTML document.
    Html,
    /// Flat Markdown document.
    Markdown,
}

/// Serializes a completed job's artifacts into client-facing report formats
/// and the external page-block document model. Pure: no network.
pub trait ReportRenderer: Send + Sync {
    /// Render `job` in the requested format.
    ///
    /// # Errors
    /// Returns an error only on serialization failure; implementations should prefer a minimal error envelope
    /// for JSON and only return `Err` in truly unexpected cases.
    fn render(&self, job: &Job, format: ReportFormat) -> Result<String>;

    /// Render `job` as a sequence of external page blocks, enforcing the
    /// hard per-block character limit.
    fn render_external_blocks(&self, job: &Job) -> Vec<ExternalBlock>;
}
