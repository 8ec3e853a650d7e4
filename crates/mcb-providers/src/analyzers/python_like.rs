//! Python-like analyzer, grounded on
//! `original_source/backend/analyzers/python_analyzer.py`'s check set,
//! reimplemented over a `tree-sitter` AST instead of `ast`/`radon`.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tree_sitter::{Node, Parser};

use mcb_ast_utils::{ComplexityAnalyzer, CursorUtils, SymbolExtractor, TreeWalker};
use mcb_domain::constants::secrets::{is_likely_secret, SECRET_PATTERNS};
use mcb_domain::constants::{languages, COMPLEXITY_HIGH_THRESHOLD, COMPLEXITY_MEDIUM_THRESHOLD};
use mcb_domain::entities::issue::stable_issue_id;
use mcb_domain::entities::{CodeIssue, FileMetrics, IssueCategory, IssueSeverity};
use mcb_domain::ports::{AnalysisOutput, LanguageAnalyzer};

/// [`LanguageAnalyzer`] for Python-like source, backed by `tree-sitter-python`.
#[derive(Debug, Default)]
pub struct PythonLikeAnalyzer;

impl LanguageAnalyzer for PythonLikeAnalyzer {
    fn language_tag(&self) -> &'static str {
        languages::PYTHON_LIKE
    }

    fn analyze(&self, path: &str, bytes: &[u8]) -> AnalysisOutput {
        let text = String::from_utf8_lossy(bytes).into_owned();
        let loc = text.lines().count();

        let mut parser = Parser::new();
        let tree = match parser.set_language(&tree_sitter_python::LANGUAGE.into()) {
            Ok(()) => parser.parse(&text, None),
            Err(_) => None,
        };

        let Some(tree) = tree.filter(|t| !t.root_node().has_error()) else {
            return AnalysisOutput {
                issues: vec![syntax_error_issue(path, &text)],
                metrics: FileMetrics::loc_only(path, languages::PYTHON_LIKE, loc),
            };
        };

        let source = text.as_bytes();
        let root = tree.root_node();
        let functions = TreeWalker::find_by_kind(root, "function_definition");

        let mut issues = Vec::new();
        let mut complexity_score = 0u32;

        for function in &functions {
            complexity_score += analyze_function_complexity(*function, source, path, &mut issues);
        }

        detect_duplication(&functions, source, path, &mut issues);
        detect_nested_loops(root, path, &mut issues);
        detect_secrets(path, &text, &mut issues);

        let duplication_percentage = duplication_percentage(&functions, source);

        AnalysisOutput {
            issues,
            metrics: FileMetrics {
                file_path: path.to_owned(),
                language: languages::PYTHON_LIKE.to_owned(),
                loc,
                complexity_score,
                duplication_percentage,
                test_coverage: None,
            },
        }
    }
}

fn syntax_error_issue(path: &str, text: &str) -> CodeIssue {
    let title = "Syntax Error";
    CodeIssue {
        id: stable_issue_id(path, Some(1), title),
        category: IssueCategory::Correctness,
        severity: IssueSeverity::High,
        title: title.to_owned(),
        description: format!("{path} could not be parsed as valid Python-like source."),
        file_path: path.to_owned(),
        line_number: Some(1),
        column: None,
        code_snippet: text.lines().next().map(ToOwned::to_owned),
        suggestion: "Fix the syntax error before further analysis can run.".to_owned(),
        impact_score: 7,
        ai_review_context: None,
    }
}

fn analyze_function_complexity(
    function: Node<'_>,
    source: &[u8],
    path: &str,
    issues: &mut Vec<CodeIssue>,
) -> u32 {
    let metrics = ComplexityAnalyzer::analyze(function);
    let name = SymbolExtractor::extract_name(function, source).unwrap_or_else(|| "<anonymous>".to_owned());
    let line = function.start_position().row + 1;
    let cyclomatic = metrics.cyclomatic as u32;

    let severity = if cyclomatic > COMPLEXITY_HIGH_THRESHOLD {
        Some(IssueSeverity::High)
    } else if cyclomatic > COMPLEXITY_MEDIUM_THRESHOLD {
        Some(IssueSeverity::Medium)
    } else {
        None
    };

    if let Some(severity) = severity {
        let title = format!("High Cyclomatic Complexity in `{name}`");
        issues.push(CodeIssue {
            id: stable_issue_id(path, Some(line), &title),
            category: IssueCategory::Complexity,
            severity,
            title,
            description: format!("`{name}` has a cyclomatic complexity of {cyclomatic}."),
            file_path: path.to_owned(),
            line_number: Some(line),
            column: None,
            code_snippet: None,
            suggestion: "Consider splitting this function into smaller, single-purpose functions.".to_owned(),
            impact_score: severity_impact(severity),
            ai_review_context: None,
        });
    }

    cyclomatic
}

fn function_body_text<'a>(function: Node<'_>, source: &'a [u8]) -> Option<&'a str> {
    CursorUtils::child_by_field(function, "body")
        .and_then(|body| body.utf8_text(source).ok())
}

fn detect_duplication(functions: &[Node<'_>], source: &[u8], path: &str, issues: &mut Vec<CodeIssue>) {
    let mut first_occurrence: HashMap<String, (String, usize)> = HashMap::new();
    let mut emitted: std::collections::HashSet<String> = std::collections::HashSet::new();

    for function in functions {
        let Some(body) = function_body_text(*function, source) else { continue };
        let Some(name) = SymbolExtractor::extract_name(*function, source) else { continue };
        let hash = hex::encode(Sha256::digest(body.as_bytes()));

        match first_occurrence.get(&hash) {
            None => {
                first_occurrence.insert(hash, (name, function.start_position().row + 1));
            }
            Some((first_name, first_line)) if *first_name != name && !emitted.contains(&hash) => {
                let title = "Duplicate Function Body Detected".to_owned();
                issues.push(CodeIssue {
                    id: stable_issue_id(path, Some(*first_line), &title),
                    category: IssueCategory::Duplication,
                    severity: IssueSeverity::Medium,
                    title,
                    description: format!("`{first_name}` and `{name}` share an identical function body."),
                    file_path: path.to_owned(),
                    line_number: Some(*first_line),
                    column: None,
                    code_snippet: None,
                    suggestion: "Extract the shared logic into a single function.".to_owned(),
                    impact_score: severity_impact(IssueSeverity::Medium),
                    ai_review_context: None,
                });
                emitted.insert(hash);
            }
            Some(_) => {}
        }
    }
}

fn duplication_percentage(functions: &[Node<'_>], source: &[u8]) -> f64 {
    if functions.is_empty() {
        return 0.0;
    }
    let mut counts: HashMap<String, usize> = HashMap::new();
    for function in functions {
        if let Some(body) = function_body_text(*function, source) {
            *counts.entry(hex::encode(Sha256::digest(body.as_bytes()))).or_insert(0) += 1;
        }
    }
    let duplicated: usize = counts.values().filter(|count| **count > 1).sum();
    (duplicated as f64 / functions.len() as f64) * 100.0
}

fn detect_nested_loops(root: Node<'_>, path: &str, issues: &mut Vec<CodeIssue>) {
    for outer in TreeWalker::find_by_kind(root, "for_statement") {
        let nested = TreeWalker::find_by_kind(outer, "for_statement");
        if nested.len() > 1 {
            let line = outer.start_position().row + 1;
            let title = "Nested Loop Detected".to_owned();
            issues.push(CodeIssue {
                id: stable_issue_id(path, Some(line), &title),
                category: IssueCategory::Performance,
                severity: IssueSeverity::Medium,
                title,
                description: "A loop contains another loop in its body, which is quadratic in the worst case."
                    .to_owned(),
                file_path: path.to_owned(),
                line_number: Some(line),
                column: None,
                code_snippet: None,
                suggestion: "Consider restructuring to avoid nested iteration, e.g. with a lookup table."
                    .to_owned(),
                impact_score: severity_impact(IssueSeverity::Medium),
                ai_review_context: None,
            });
        }
    }
}

fn detect_secrets(path: &str, text: &str, issues: &mut Vec<CodeIssue>) {
    for (idx, line) in text.lines().enumerate() {
        let is_comment = line.trim_start().starts_with('#');
        for pattern in SECRET_PATTERNS.iter() {
            if pattern.pattern.is_match(line) && is_likely_secret(line, is_comment) {
                let line_number = idx + 1;
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
}

fn severity_impact(severity: IssueSeverity) -> u8 {
    match severity {
        IssueSeverity::Critical => 9,
        IssueSeverity::High => 7,
        IssueSeverity::Medium => 5,
        IssueSeverity::Low => 2,
    }
}
