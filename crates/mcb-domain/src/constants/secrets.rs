//! The shared hardcoded-secret pattern catalog.
//!
//! Used by both the Python-like and JS-like analyzers. Patterns use
//! `["']?` style optional quoting so the same table matches both Python
//! (`API_KEY = "..."`) and JS (`const apiKey = "..."`) assignment forms.

use std::sync::LazyLock;

use regex::Regex;

use crate::entities::IssueSeverity;

/// A single entry in the secret catalog: a compiled pattern, a
/// human-readable label, and the severity to assign on a match.
pub struct SecretPattern {
    /// Compiled regex, case-insensitive.
    pub pattern: Regex,
    /// Label used in the issue title (`"Hardcoded {label} Detected"`).
    pub label: &'static str,
    /// Severity assigned to a confirmed match.
    pub severity: IssueSeverity,
}

/// Phrases that, when present on the matching line, suppress an otherwise
/// positive secret match (test fixtures, placeholders, env dereferences).
pub const TEST_INDICATORS: &[&str] = &[
    "test",
    "example",
    "dummy",
    "fake",
    "mock",
    "sample",
    "your_key_here",
    "replace_me",
    "todo",
    "fixme",
    "xxxxxx",
    "123456",
    "abcdef",
];

fn pattern(src: &str, label: &'static str, severity: IssueSeverity) -> SecretPattern {
    SecretPattern {
        pattern: Regex::new(&format!("(?i){src}")).expect("secret pattern must compile"),
        label,
        severity,
    }
}

/// The full secret-pattern catalog, compiled once.
pub static SECRET_PATTERNS: LazyLock<Vec<SecretPattern>> = LazyLock::new(|| {
    vec![
        pattern(
            r#"["']?API_?KEY["']?\s*[=:]\s*["'][^"']{20,}["']"#,
            "API Key",
            IssueSeverity::Critical,
        ),
        pattern(
            r#"["']?GOOGLE_API_KEY["']?\s*[=:]\s*["'][^"']{20,}["']"#,
            "Google API Key",
            IssueSeverity::Critical,
        ),
        pattern(
            r#"["']?OPENAI_API_KEY["']?\s*[=:]\s*["'][^"']{20,}["']"#,
            "OpenAI API Key",
            IssueSeverity::Critical,
        ),
        pattern(
            r#"["']?AWS_ACCESS_KEY["']?\s*[=:]\s*["'][^"']{16,}["']"#,
            "AWS Access Key",
            IssueSeverity::Critical,
        ),
        pattern(
            r#"["']?PASSWORD["']?\s*[=:]\s*["'][^"']{6,}["']"#,
            "Password",
            IssueSeverity::High,
        ),
        pattern(
            r#"["']?DB_PASSWORD["']?\s*[=:]\s*["'][^"']{6,}["']"#,
            "Database Password",
            IssueSeverity::High,
        ),
        pattern(
            r#"["']?TOKEN["']?\s*[=:]\s*["'][^"']{20,}["']"#,
            "Access Token",
            IssueSeverity::High,
        ),
        pattern(
            r#"["']?SECRET["']?\s*[=:]\s*["'][^"']{16,}["']"#,
            "Secret Key",
            IssueSeverity::High,
        ),
        pattern(r#"sk-[A-Za-z0-9]{32,}"#, "OpenAI Secret Key Format", IssueSeverity::Critical),
        pattern(r#"AIza[A-Za-z0-9_-]{35}"#, "Google API Key Format", IssueSeverity::Critical),
        pattern(r#"AKIA[A-Z0-9]{16}"#, "AWS Access Key Format", IssueSeverity::Critical),
        pattern(
            r#"["'][A-Za-z0-9]{32,}["']"#,
            "Potential Secret (32+ chars)",
            IssueSeverity::Medium,
        ),
    ]
});

/// Whether `line` looks like a genuine secret, beyond the raw pattern match.
///
/// Suppresses matches on comment lines, lines mentioning a test indicator,
/// and lines that dereference an environment variable rather than hardcode
/// a literal.
#[must_use]
pub fn is_likely_secret(line: &str, is_comment: bool) -> bool {
    if is_comment {
        return false;
    }

    let lower = line.to_ascii_lowercase();
    if TEST_INDICATORS.iter().any(|indicator| lower.contains(indicator)) {
        return false;
    }

    if lower.contains("os.getenv") || lower.contains("environ") || lower.contains("process.env") {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_an_openai_style_key() {
        let line = r#"API_KEY = "sk-0123456789abcdef0123456789abcdef""#;
        let matched = SECRET_PATTERNS.iter().any(|p| p.pattern.is_match(line));
        assert!(matched);
        assert!(is_likely_secret(line, false));
    }

    #[test]
    fn suppresses_test_fixtures() {
        let line = r#"API_KEY = "test_key_1234567890123456789012""#;
        assert!(!is_likely_secret(line, false));
    }

    #[test]
    fn suppresses_env_dereferences() {
        let line = r#"API_KEY = os.getenv("API_KEY")"#;
        assert!(!is_likely_secret(line, false));
    }

    #[test]
    fn suppresses_comments() {
        let line = r#"# API_KEY = "sk-0123456789abcdef0123456789abcdef""#;
        assert!(!is_likely_secret(line, true));
    }
}
