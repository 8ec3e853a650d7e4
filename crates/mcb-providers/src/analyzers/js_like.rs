//! JavaScript/TypeScript-like analyzer, grounded on
//! `original_source/backend/analyzers/javascript_analyzer.py`'s line/window
//! regex checks, reimplemented without an AST dependency since the
//! workspace carries `tree-sitter-python` but not a JS grammar.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use mcb_domain::constants::secrets::{is_likely_secret, SECRET_PATTERNS};
use mcb_domain::constants::languages;
use mcb_domain::entities::issue::stable_issue_id;
use mcb_domain::entities::{CodeIssue, FileMetrics, IssueCategory, IssueSeverity};
use mcb_domain::ports::{AnalysisOutput, LanguageAnalyzer};

const LONG_FUNCTION_LINE_THRESHOLD: usize = 50;

static CONSOLE_LOG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"console\.log\s*\(").unwrap());
static VAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bvar\s+\w").unwrap());
static EVAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\beval\s*\(").unwrap());
static INNER_HTML_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.innerHTML\s*=").unwrap());
static DOCUMENT_WRITE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"document\.write\s*\(").unwrap());
static DOM_QUERY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:document\.)?(?:querySelector(?:All)?|getElementById)\s*\(").unwrap());
static LOOP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(for|while)\s*\(").unwrap());
static BRANCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(if|else\s+if|for|while|case|catch)\b|&&|\|\|").unwrap());
static FUNCTION_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"function\s+(\w+)\s*\(").unwrap(),
        Regex::new(r"(\w+)\s*=\s*function\s*\(").unwrap(),
        Regex::new(r"(?:const|let|var)\s+(\w+)\s*=\s*(?:async\s*)?\([^)]*\)\s*=>").unwrap(),
        Regex::new(r"(\w+)\s*\([^)]*\)\s*\{").unwrap(),
    ]
});

/// [`LanguageAnalyzer`] for JavaScript/TypeScript-like source.
#[derive(Debug, Default)]
pub struct JsLikeAnalyzer;

struct FunctionFrame {
    start_line: usize,
    depth_at_open: i32,
    name: String,
}

impl LanguageAnalyzer for JsLikeAnalyzer {
    fn language_tag(&self) -> &'static str {
        languages::JS_LIKE
    }

    fn analyze(&self, path: &str, bytes: &[u8]) -> AnalysisOutput {
        let text = String::from_utf8_lossy(bytes).into_owned();
        let lines: Vec<&str> = text.lines().collect();

        let mut issues = Vec::new();
        let mut depth: i32 = 0;
        let mut function_stack: Vec<FunctionFrame> = Vec::new();
        let mut loop_depths: Vec<i32> = Vec::new();
        let mut branch_matches = 0usize;
        let mut duplicate_groups: HashMap<String, (String, usize)> = HashMap::new();
        let mut emitted_duplicates = std::collections::HashSet::new();

        for (idx, line) in lines.iter().enumerate() {
            let line_number = idx + 1;
            let inside_loop = !loop_depths.is_empty();

            check_line_pattern(&CONSOLE_LOG_RE, line, path, line_number, "console.log Statement", IssueSeverity::Low, IssueCategory::Style, &mut issues);
            check_line_pattern(&VAR_RE, line, path, line_number, "`var` Declaration", IssueSeverity::Low, IssueCategory::Style, &mut issues);
            check_line_pattern(&EVAL_RE, line, path, line_number, "Use of `eval`", IssueSeverity::High, IssueCategory::Security, &mut issues);
            check_line_pattern(&INNER_HTML_RE, line, path, line_number, "Unsanitized `innerHTML` Assignment", IssueSeverity::Medium, IssueCategory::Security, &mut issues);
            check_line_pattern(&DOCUMENT_WRITE_RE, line, path, line_number, "Use of `document.write`", IssueSeverity::Medium, IssueCategory::Security, &mut issues);

            if inside_loop && DOM_QUERY_RE.is_match(line) {
                push_issue(&mut issues, path, line_number, "DOM Query Inside a Loop", IssueSeverity::Medium, IssueCategory::Performance, line,
                    "Cache the DOM lookup outside the loop instead of re-querying on every iteration.");
            }

            branch_matches += BRANCH_RE.find_iter(line).count();

            if LOOP_RE.is_match(line) {
                loop_depths.push(depth);
            }

            for re in FUNCTION_RES.iter() {
                if let Some(captures) = re.captures(line) {
                    let name = captures.get(1).map_or_else(|| "<anonymous>".to_owned(), |m| m.as_str().to_owned());
                    function_stack.push(FunctionFrame { start_line: line_number, depth_at_open: depth, name });
                    break;
                }
            }

            let delta = line.matches('{').count() as i32 - line.matches('}').count() as i32;
            depth += delta;

            while loop_depths.last().is_some_and(|d| depth <= *d) {
                loop_depths.pop();
            }

            while function_stack.last().is_some_and(|f| depth <= f.depth_at_open && line_number > f.start_line) {
                let frame = function_stack.pop().unwrap();
                let length = line_number - frame.start_line + 1;
                if length > LONG_FUNCTION_LINE_THRESHOLD {
                    let title = format!("Long Function `{}`", frame.name);
                    issues.push(CodeIssue {
                        id: stable_issue_id(path, Some(frame.start_line), &title),
                        category: IssueCategory::Complexity,
                        severity: IssueSeverity::Medium,
                        title,
                        description: format!("`{}` spans {length} lines.", frame.name),
                        file_path: path.to_owned(),
                        line_number: Some(frame.start_line),
                        column: None,
                        code_snippet: None,
                        suggestion: "Consider splitting this function into smaller, focused functions.".to_owned(),
                        impact_score: 5,
                        ai_review_context: None,
                    });
                }

                let body = lines[frame.start_line.saturating_sub(1)..line_number].join("\n");
                let hash = hex::encode(Sha256::digest(body.as_bytes()));
                match duplicate_groups.get(&hash) {
                    None => {
                        duplicate_groups.insert(hash, (frame.name, frame.start_line));
                    }
                    Some((first_name, first_line)) if *first_name != frame.name && !emitted_duplicates.contains(&hash) => {
                        let title = "Duplicate Function Body Detected".to_owned();
                        issues.push(CodeIssue {
                            id: stable_issue_id(path, Some(*first_line), &title),
                            category: IssueCategory::Duplication,
                            severity: IssueSeverity::Medium,
                            title,
                            description: format!("`{first_name}` and `{}` share an identical function body.", frame.name),
                            file_path: path.to_owned(),
                            line_number: Some(*first_line),
                            column: None,
                            code_snippet: None,
                            suggestion: "Extract the shared logic into a single function.".to_owned(),
                            impact_score: 5,
                            ai_review_context: None,
                        });
                        emitted_duplicates.insert(hash);
                    }
                    Some(_) => {}
                }
            }

            let is_comment = line.trim_start().starts_with("//");
            for pattern in SECRET_PATTERNS.iter() {
                if pattern.pattern.is_match(line) && is_likely_secret(line, is_comment) {
                    let title = format!("Hardcoded {} Detected", pattern.label);
                    issues.push(CodeIssue {
                        id: stable_issue_id(path, Some(line_number), &title),
                        category: IssueCategory::Security,
                        severity: pattern.severity,
                        title,
                        description: format!("Line {line_number} appears to contain a hardcoded {}.", pattern.label),
                        file_path: path.to_owned(),
                        line_number: Some(line_number),
                        column: None,
                        code_snippet: Some(line.trim().to_owned()),
                        suggestion: "Move this value into an environment variable or secret store.".to_owned(),
                        impact_score: severity_impact(pattern.severity),
                        ai_review_context: None,
                    });
                    break;
                }
            }
        }

        AnalysisOutput {
            issues,
            metrics: FileMetrics {
                file_path: path.to_owned(),
                language: languages::JS_LIKE.to_owned(),
                loc: lines.len(),
                complexity_score: 1 + branch_matches as u32,
                duplication_percentage: 0.0,
                test_coverage: None,
            },
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn check_line_pattern(
    re: &Regex,
    line: &str,
    path: &str,
    line_number: usize,
    title: &str,
    severity: IssueSeverity,
    category: IssueCategory,
    issues: &mut Vec<CodeIssue>,
) {
    if re.is_match(line) {
        push_issue(issues, path, line_number, title, severity, category, line, "");
    }
}

fn push_issue(
    issues: &mut Vec<CodeIssue>,
    path: &str,
    line_number: usize,
    title: &str,
    severity: IssueSeverity,
    category: IssueCategory,
    line: &str,
    suggestion: &str,
) {
    issues.push(CodeIssue {
        id: stable_issue_id(path, Some(line_number), title),
        category,
        severity,
        title: title.to_owned(),
        description: format!("{title} at line {line_number}."),
        file_path: path.to_owned(),
        line_number: Some(line_number),
        column: None,
        code_snippet: Some(line.trim().to_owned()),
        suggestion: suggestion.to_owned(),
        impact_score: severity_impact(severity),
        ai_review_context: None,
    });
}

fn severity_impact(severity: IssueSeverity) -> u8 {
    match severity {
        IssueSeverity::Critical => 9,
        IssueSeverity::High => 7,
        IssueSeverity::Medium => 5,
        IssueSeverity::Low => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_console_log_and_var() {
        let analyzer = JsLikeAnalyzer;
        let output = analyzer.analyze("app.js", b"var x = 1;\nconsole.log(x);\n");
        assert!(output.issues.iter().any(|i| i.title.contains("console.log")));
        assert!(output.issues.iter().any(|i| i.title.contains("var")));
    }

    #[test]
    fn flags_eval_as_high_severity() {
        let analyzer = JsLikeAnalyzer;
        let output = analyzer.analyze("app.js", b"eval(userInput);\n");
        let issue = output.issues.iter().find(|i| i.title.contains("eval")).unwrap();
        assert_eq!(issue.severity, IssueSeverity::High);
    }

    #[test]
    fn flags_a_dom_query_inside_a_loop() {
        let code = b"for (let i = 0; i < 10; i++) {\n  document.getElementById('x');\n}\n";
        let analyzer = JsLikeAnalyzer;
        let output = analyzer.analyze("app.js", code);
        assert!(output.issues.iter().any(|i| i.title.contains("DOM Query")));
    }

    #[test]
    fn flags_a_hardcoded_secret() {
        let analyzer = JsLikeAnalyzer;
        let code = b"const apiKey = \"sk-0123456789abcdef0123456789abcdef\";\n";
        let output = analyzer.analyze("app.js", code);
        assert!(output.issues.iter().any(|i| i.category == IssueCategory::Security));
    }

    #[test]
    fn clean_file_yields_no_issues() {
        let analyzer = JsLikeAnalyzer;
        let output = analyzer.analyze("clean.js", b"export function add(a, b) {\n  return a + b;\n}\n");
        assert!(output.issues.is_empty());
    }
}
