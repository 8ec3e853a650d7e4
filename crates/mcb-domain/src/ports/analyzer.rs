//! The language analyzer port (C3).
//!
//! Analyzers are pure per the state machine: no network, no global state, and
//! therefore no `async`. Each analyzer covers exactly one language tag.

use crate::entities::{CodeIssue, FileMetrics};

/// Output of a single analyzer invocation on one file.
pub struct AnalysisOutput {
    /// Issues found in the file.
    pub issues: Vec<CodeIssue>,
    /// Metrics computed for the file.
    pub metrics: FileMetrics,
}

/// A per-language analyzer: `(path, bytes) -> (issues, metrics)`.
pub trait LanguageAnalyzer: Send + Sync {
    /// The language tag this analyzer handles (see
    /// [`crate::constants::languages`]).
    fn language_tag(&self) -> &'static str;

    /// Analyze a single file's contents.
    fn analyze(&self, path: &str, bytes: &[u8]) -> AnalysisOutput;
}
