//! `FileMetrics` and `FileMetadata`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-file metrics produced by a language analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetrics {
    /// Path of the analyzed file.
    pub file_path: String,
    /// Language tag (`"python-like"`, `"js-like"`, `"docker"`, ...).
    pub language: String,
    /// Lines of code.
    pub loc: usize,
    /// Aggregate cyclomatic complexity across functions in the file.
    pub complexity_score: u32,
    /// Estimated duplication percentage, `0.0..=100.0`.
    pub duplication_percentage: f64,
    /// Test coverage percentage, when known.
    pub test_coverage: Option<f64>,
}

impl FileMetrics {
    /// Minimal metrics for a file whose parse failed: LOC only.
    #[must_use]
    pub fn loc_only(file_path: impl Into<String>, language: impl Into<String>, loc: usize) -> Self {
        Self {
            file_path: file_path.into(),
            language: language.into(),
            loc,
            complexity_score: 0,
            duplication_percentage: 0.0,
            test_coverage: None,
        }
    }
}

/// Per-file freeform record holding LLM-derived enrichments.
///
/// Written by the analyzer enhancer (C4); read by the AI review stage (C5)
/// when composing its cross-corpus prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileMetadata {
    /// LLM-produced one-paragraph summary of the file, if enhancement ran
    /// and succeeded.
    pub summary: Option<String>,
    /// Enhanced suggestion text keyed by the issue id it augments.
    #[serde(default)]
    pub enhanced_suggestions: HashMap<String, String>,
    /// Whether this file's content was truncated before being sent to the
    /// LLM (controls what the AI review stage includes for this file).
    #[serde(default)]
    pub content_truncated: bool,
    /// Free-form business-impact note from the enhancer, if any.
    pub business_impact: Option<String>,
}
