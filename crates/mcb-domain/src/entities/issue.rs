//! `CodeIssue` and its supporting enums.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Category of a [`CodeIssue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCategory {
    /// Hardcoded secrets, unsafe eval, missing `USER`, etc.
    Security,
    /// Nested loops, expensive DOM queries in loops, etc.
    Performance,
    /// Structurally identical code in two places.
    Duplication,
    /// Excessive cyclomatic complexity or function length.
    Complexity,
    /// Missing or inadequate test coverage.
    Testing,
    /// Missing or inadequate documentation.
    Documentation,
    /// Style nits (`console.log`, `var`, `:latest` tags).
    Style,
    /// Logic likely to be wrong (missing `CMD`/`ENTRYPOINT`, syntax errors).
    Correctness,
    /// Long-term maintainability concerns.
    Maintainability,
}

/// Severity of a [`CodeIssue`], ordered `Critical > High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueSeverity {
    /// Ordered last so the derived `Ord` sorts `Critical` first when reversed.
    Low,
    Medium,
    High,
    Critical,
}

/// Context attached to issues produced or touched by the AI review stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiReviewContext {
    /// Free-form rationale the model gave for the severity/suggestion.
    pub rationale: String,
    /// Whether this issue was newly discovered by the review stage (as
    /// opposed to an analyzer-produced issue the review stage enhanced).
    pub newly_discovered: bool,
}

/// A single finding emitted by an analyzer or by the AI review stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeIssue {
    /// Stable identifier; see [`stable_issue_id`] for analyzer-produced ids.
    pub id: String,
    /// Issue category.
    pub category: IssueCategory,
    /// Issue severity.
    pub severity: IssueSeverity,
    /// Short human-readable title.
    pub title: String,
    /// Longer description of the finding.
    pub description: String,
    /// Path of the file the issue was found in.
    pub file_path: String,
    /// Line number, when known.
    pub line_number: Option<usize>,
    /// Column number, when known.
    pub column: Option<usize>,
    /// A short code excerpt illustrating the issue.
    pub code_snippet: Option<String>,
    /// Suggested remediation.
    pub suggestion: String,
    /// Estimated impact, `0..=10`.
    pub impact_score: u8,
    /// Present when this issue was produced or touched by the AI review.
    pub ai_review_context: Option<AiReviewContext>,
}

impl CodeIssue {
    /// Normalize a title for use in [`stable_issue_id`]: lowercase,
    /// non-alphanumeric runs collapsed to a single `-`.
    #[must_use]
    pub fn normalize_title(title: &str) -> String {
        let mut normalized = String::with_capacity(title.len());
        let mut last_was_sep = true;
        for ch in title.chars() {
            if ch.is_alphanumeric() {
                normalized.push(ch.to_ascii_lowercase());
                last_was_sep = false;
            } else if !last_was_sep {
                normalized.push('-');
                last_was_sep = true;
            }
        }
        normalized.trim_end_matches('-').to_string()
    }
}

/// Deterministic id for an analyzer-produced issue: `{basename(path)}-{line}-{normalized_title}`.
///
/// Guarantees the id-stability invariant from §3: the same issue detected at
/// the same file/line/title across two runs on identical input is
/// byte-identical.
#[must_use]
pub fn stable_issue_id(file_path: &str, line_number: Option<usize>, title: &str) -> String {
    let basename = file_path.rsplit('/').next().unwrap_or(file_path);
    let line = line_number.map_or_else(|| "0".to_string(), |l| l.to_string());
    format!("{basename}-{line}-{}", CodeIssue::normalize_title(title))
}

/// Namespaced id for an AI-produced issue, derived from a hash of its
/// content so repeated review passes over unchanged input are idempotent.
#[must_use]
pub fn ai_issue_id(file_path: &str, title: &str, description: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_path.as_bytes());
    hasher.update(title.as_bytes());
    hasher.update(description.as_bytes());
    let digest = hasher.finalize();
    let full = format!("ai-{digest:x}");
    full[..18.min(full.len())].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_titles_to_a_stable_slug() {
        assert_eq!(
            CodeIssue::normalize_title("Hardcoded API Key Detected!"),
            "hardcoded-api-key-detected"
        );
    }

    #[test]
    fn stable_id_uses_basename_line_and_slug() {
        let id = stable_issue_id("src/app/main.py", Some(12), "Hardcoded Secret Detected");
        assert_eq!(id, "main.py-12-hardcoded-secret-detected");
    }

    #[test]
    fn stable_id_is_deterministic() {
        let a = stable_issue_id("a.py", Some(1), "Nested Loop");
        let b = stable_issue_id("a.py", Some(1), "Nested Loop");
        assert_eq!(a, b);
    }

    #[test]
    fn ai_issue_id_is_deterministic_for_identical_content() {
        let a = ai_issue_id("a.py", "Title", "Description");
        let b = ai_issue_id("a.py", "Title", "Description");
        assert_eq!(a, b);
    }
}
