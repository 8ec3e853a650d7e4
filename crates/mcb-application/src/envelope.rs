//! The AI-review JSON envelope and its repair pipeline (C5).
//!
//! Modeled as a short chain of tagged-result functions rather than
//! exception-driven control flow (Design Note §9): each step either yields a
//! parsed envelope or passes a reason forward, and the final fallback is a
//! fixed `partial` envelope so the AI-review stage never throws.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use mcb_domain::entities::{IssueCategory, IssueSeverity};

/// One `enhanced_issues[i]` entry: merges onto an existing issue by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnhancedIssueUpdate {
    /// Id of the existing issue this entry enhances.
    pub id: String,
    /// Replacement suggestion text, if provided.
    pub suggestion: Option<String>,
    /// Replacement impact score, if provided.
    pub impact_score: Option<u8>,
    /// Replacement severity, if provided.
    pub severity: Option<IssueSeverity>,
    /// Replacement description, if provided.
    pub description: Option<String>,
    /// Replacement title, if provided.
    pub title: Option<String>,
    /// Model's rationale for the update; stored as `ai_review_context.rationale`.
    pub rationale: Option<String>,
    /// Populated only when the merger has to synthesize a new issue because
    /// the enhanced id did not already exist.
    pub file_path: Option<String>,
    /// See [`Self::file_path`].
    pub line_number: Option<usize>,
}

/// One `new_issues_found[i]` entry: a genuinely new issue with a fresh,
/// namespaced id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAiIssue {
    /// Fresh, namespaced issue id (see [`mcb_domain::entities::ai_issue_id`]).
    pub id: String,
    /// Issue category.
    pub category: IssueCategory,
    /// Issue severity.
    pub severity: IssueSeverity,
    /// Short title.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Path of the file the issue was found in.
    pub file_path: String,
    /// Line number, when the reviewer's line-verification tiers located one.
    pub line_number: Option<usize>,
    /// Snippet the reviewer cited, if any.
    pub code_snippet: Option<String>,
    /// Suggested remediation.
    pub suggestion: String,
    /// Estimated impact, `0..=10`.
    pub impact_score: u8,
    /// Model's rationale.
    pub rationale: String,
}

/// Aggregate quality metrics reported by the AI review.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Overall 0-100 quality score.
    #[serde(default)]
    pub overall_score: f64,
}

/// The full strict JSON envelope returned by the AI-review stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiEnvelope {
    /// High-level prose summary of the corpus.
    #[serde(default)]
    pub executive_summary: String,
    /// High-level prose architecture commentary.
    #[serde(default)]
    pub architecture_analysis: String,
    /// Updates merged onto existing issues.
    #[serde(default)]
    pub enhanced_issues: Vec<EnhancedIssueUpdate>,
    /// Brand-new issues the review discovered.
    #[serde(default)]
    pub new_issues_found: Vec<NewAiIssue>,
    /// Free-form remediation recommendations.
    #[serde(default)]
    pub recommendations: Vec<String>,
    /// Aggregate quality metrics.
    #[serde(default)]
    pub quality_metrics: QualityMetrics,
    /// Free-form technical-debt commentary.
    #[serde(default)]
    pub technical_debt: String,
    /// Set when this envelope is a best-effort partial extraction rather
    /// than a fully parsed response.
    #[serde(default)]
    pub error: Option<String>,
}

impl AiEnvelope {
    /// A minimal envelope for when the model is entirely unavailable or
    /// returned an empty response ( boundary: "analyzer issues are
    /// preserved unchanged; `ai_review.error` is set").
    #[must_use]
    pub fn empty_with_error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

/// Parse a raw LLM completion into an [`AiEnvelope`], tolerating the
/// formatting noise real models produce.
///
/// Pipeline: strip code fences -> locate the outermost `{...}` -> parse ->
/// on failure, extract whatever partial fields are present.
#[must_use]
pub fn parse_ai_envelope(raw: &str) -> AiEnvelope {
    if raw.trim().is_empty() {
        return AiEnvelope::empty_with_error("empty LLM response");
    }

    let candidate = strip_fences(raw);
    let Some(braces) = locate_outermost_braces(&candidate) else {
        return partial_extract(&candidate, "no JSON object found in response");
    };

    match serde_json::from_str::<AiEnvelope>(braces) {
        Ok(envelope) => envelope,
        Err(first_err) => match repair_and_parse(braces) {
            Some(envelope) => envelope,
            None => partial_extract(braces, &format!("malformed JSON: {first_err}")),
        },
    }
}

/// Strip surrounding ``` fences, if present.
fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("```json") {
        rest.strip_suffix("```").unwrap_or(rest).trim().to_owned()
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest.strip_suffix("```").unwrap_or(rest).trim().to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Find the outermost balanced `{...}` span, ignoring braces inside string
/// literals.
fn locate_outermost_braces(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let start = text.find('{')?;
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, &byte) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=offset]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Attempt a stricter repair pass: fix dangling commas and truncate at the
/// last balanced brace, then re-parse.
fn repair_and_parse(candidate: &str) -> Option<AiEnvelope> {
    let de_commaed = remove_dangling_commas(candidate);
    if let Ok(envelope) = serde_json::from_str::<AiEnvelope>(&de_commaed) {
        return Some(envelope);
    }

    let truncated = truncate_at_last_balanced_brace(&de_commaed)?;
    serde_json::from_str::<AiEnvelope>(&truncated).ok()
}

fn remove_dangling_commas(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if ch == ',' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if matches!(chars.get(j), Some('}') | Some(']')) {
                i += 1;
                continue;
            }
        }
        out.push(ch);
        i += 1;
    }
    out
}

fn truncate_at_last_balanced_brace(text: &str) -> Option<String> {
    let mut depth = 0i32;
    let mut last_balanced = None;
    for (idx, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    last_balanced = Some(idx);
                }
            }
            _ => {}
        }
    }
    last_balanced.map(|idx| text[..=idx].to_owned())
}

/// Best-effort field-by-field extraction when full parsing fails entirely.
fn partial_extract(candidate: &str, reason: &str) -> AiEnvelope {
    let value: Option<Value> = serde_json::from_str(candidate).ok();
    let executive_summary = value
        .as_ref()
        .and_then(|v| v.get("executive_summary"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned();
    let quality_metrics = value
        .as_ref()
        .and_then(|v| v.get("quality_metrics"))
        .and_then(|v| v.get("overall_score"))
        .and_then(Value::as_f64)
        .map_or(QualityMetrics::default(), |overall_score| QualityMetrics { overall_score });

    AiEnvelope {
        executive_summary,
        enhanced_issues: Vec::new(),
        new_issues_found: Vec::new(),
        quality_metrics,
        error: Some(reason.to_owned()),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_clean_envelope() {
        let raw = r#"{"executive_summary":"ok","enhanced_issues":[],"new_issues_found":[]}"#;
        let envelope = parse_ai_envelope(raw);
        assert_eq!(envelope.executive_summary, "ok");
        assert!(envelope.error.is_none());
    }

    #[test]
    fn strips_markdown_fences() {
        let raw = "```json\n{\"executive_summary\":\"fenced\"}\n```";
        let envelope = parse_ai_envelope(raw);
        assert_eq!(envelope.executive_summary, "fenced");
    }

    #[test]
    fn repairs_a_dangling_comma() {
        let raw = r#"{"executive_summary":"trailing","enhanced_issues":[],}"#;
        let envelope = parse_ai_envelope(raw);
        assert_eq!(envelope.executive_summary, "trailing");
        assert!(envelope.error.is_none());
    }

    #[test]
    fn falls_back_to_partial_extract_on_garbage() {
        let envelope = parse_ai_envelope("not json at all");
        assert!(envelope.error.is_some());
        assert!(envelope.enhanced_issues.is_empty());
    }

    #[test]
    fn empty_response_sets_error_without_panicking() {
        let envelope = parse_ai_envelope("");
        assert_eq!(envelope.error.as_deref(), Some("empty LLM response"));
    }

    #[test]
    fn extracts_outermost_braces_ignoring_prose_wrapper() {
        let raw = "Sure, here you go:\n{\"executive_summary\":\"wrapped\"}\nHope that helps!";
        let envelope = parse_ai_envelope(raw);
        assert_eq!(envelope.executive_summary, "wrapped");
    }
}
