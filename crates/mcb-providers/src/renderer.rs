//! Report renderer: three output formats (JSON, HTML, Markdown) plus the
//! chunked external-page document.
//!
//! HTML is rendered through `handlebars`; Markdown and the external block
//! document are built as plain strings, hand-assembling non-HTML output
//! rather than reaching for a markdown-emission crate.

use handlebars::Handlebars;
use serde_json::json;

use mcb_domain::constants::EXTERNAL_BLOCK_MAX_CHARS;
use mcb_domain::entities::{CodeIssue, Job, JobStatus};
use mcb_domain::error::{Error, Result};
use mcb_domain::ports::{ExternalBlock, ReportFormat, ReportRenderer};

/// Hard ceiling on the number of blocks a single render may emit, guarding
/// against a pathologically long executive summary producing an unbounded
/// document. Crossing it falls back to a truncated minimal document; this
/// renderer is a pure function of the job record, so the same input always
/// produces the same (already within-limit) blocks, and there is nothing
/// to regenerate against.
const MAX_EXTERNAL_BLOCKS: usize = 200;

const HTML_TEMPLATE_NAME: &str = "report_html";

const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8">
<title>Code Analysis Report</title>
<style>
body { font-family: sans-serif; margin: 2rem; color: #1f2933; }
.summary-table { border-collapse: collapse; margin-bottom: 1.5rem; }
.summary-table td, .summary-table th { border: 1px solid #ccc; padding: 0.4rem 0.8rem; text-align: left; }
.issue { border: 1px solid #ddd; border-radius: 6px; padding: 0.75rem 1rem; margin-bottom: 0.75rem; }
.badge { display: inline-block; padding: 0.1rem 0.5rem; border-radius: 4px; font-size: 0.8rem; margin-right: 0.4rem; }
.badge-severity { background: #fee2e2; }
.badge-category { background: #e0e7ff; }
pre.snippet { background: #f8fafc; padding: 0.5rem; overflow-x: auto; }
</style>
</head>
<body>
<h1>Code Analysis Report &mdash; {{job_id}}</h1>
<table class="summary-table">
<tr><th>Total files</th><td>{{summary.total_files}}</td></tr>
<tr><th>Total issues</th><td>{{summary.total_issues}}</td></tr>
<tr><th>Critical</th><td>{{summary.critical_count}} ({{summary.critical_pct}}%)</td></tr>
<tr><th>High</th><td>{{summary.high_count}} ({{summary.high_pct}}%)</td></tr>
<tr><th>Medium</th><td>{{summary.medium_count}} ({{summary.medium_pct}}%)</td></tr>
<tr><th>Low</th><td>{{summary.low_count}} ({{summary.low_pct}}%)</td></tr>
</table>
<h2>Issues</h2>
{{#each issues}}
<div class="issue">
<h3>{{this.title}}</h3>
<p>{{this.file_path}}:{{this.line}}</p>
<span class="badge badge-severity">{{this.severity}}</span>
<span class="badge badge-category">{{this.category}}</span>
<p>{{this.description}}</p>
{{#if this.suggestion}}<p><strong>Suggestion:</strong> {{this.suggestion}}</p>{{/if}}
{{#if this.ai_insight}}<p><strong>AI insight:</strong> {{this.ai_insight}}</p>{{/if}}
{{#if this.code_snippet}}<pre class="snippet">{{this.code_snippet}}</pre>{{/if}}
</div>
{{/each}}
</body>
</html>
"#;

/// [`ReportRenderer`] backed by `handlebars` for HTML and plain string
/// assembly for Markdown and the external block document.
pub struct TemplateReportRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateReportRenderer {
    fn default() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(false);
        handlebars
            .register_template_string(HTML_TEMPLATE_NAME, HTML_TEMPLATE)
            .expect("HTML_TEMPLATE is a fixed, valid handlebars template");
        Self { handlebars }
    }
}

impl TemplateReportRenderer {
    /// Construct a renderer with its HTML template pre-registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn render_json(job: &Job) -> Result<String> {
        match serde_json::to_string_pretty(job) {
            Ok(body) => Ok(body),
            Err(err) => {
                tracing::error!(job_id = %job.id, error = %err, "job serialization failed");
                serde_json::to_string(&json!({
                    "job_id": job.id.to_string(),
                    "error": "could not render complete JSON report",
                }))
                .map_err(Error::from)
            }
        }
    }

    fn render_html(&self, job: &Job) -> Result<String> {
        let context = html_context(job);
        self.handlebars
            .render(HTML_TEMPLATE_NAME, &context)
            .map_err(|e| Error::unexpected(format!("HTML template render failed: {e}")))
    }

    fn render_markdown(job: &Job) -> String {
        let mut out = String::new();
        out.push_str(&format!("# Code Analysis Report — {}\n\n", job.id));

        if let Some(summary) = &job.summary {
            out.push_str("## Summary\n\n");
            out.push_str(&format!("- **Total files**: {}\n", summary.total_files));
            out.push_str(&format!("- **Total issues**: {}\n", summary.total_issues));
            out.push_str(&format!(
                "- **Critical**: {} ({:.1}%)\n",
                summary.severity_distribution.critical.count, summary.severity_distribution.critical.percentage
            ));
            out.push_str(&format!(
                "- **High**: {} ({:.1}%)\n",
                summary.severity_distribution.high.count, summary.severity_distribution.high.percentage
            ));
            out.push_str(&format!(
                "- **Medium**: {} ({:.1}%)\n",
                summary.severity_distribution.medium.count, summary.severity_distribution.medium.percentage
            ));
            out.push_str(&format!(
                "- **Low**: {} ({:.1}%)\n\n",
                summary.severity_distribution.low.count, summary.severity_distribution.low.percentage
            ));
        }

        if let Some(executive_summary) = &job.executive_summary {
            out.push_str("## Executive Summary\n\n");
            out.push_str(executive_summary);
            out.push_str("\n\n");
        }

        out.push_str("## Issues\n\n");
        for issue in &job.issues {
            out.push_str(&format!("### {}\n\n", issue.title));
            out.push_str(&format!(
                "- **File**: {}:{}\n",
                issue.file_path,
                issue.line_number.map_or_else(|| "-".to_owned(), |n| n.to_string())
            ));
            out.push_str(&format!("- **Severity**: {}\n", severity_label(issue)));
            out.push_str(&format!("- **Category**: {}\n", category_label(issue)));
            out.push_str(&format!("- **Description**: {}\n", issue.description));
            if !issue.suggestion.is_empty() {
                out.push_str(&format!("- **Suggestion**: {}\n", issue.suggestion));
            }
            if let Some(ctx) = &issue.ai_review_context {
                out.push_str(&format!("- **AI insight**: {}\n", ctx.rationale));
            }
            if let Some(snippet) = &issue.code_snippet {
                out.push_str(&format!("\n```\n{snippet}\n```\n"));
            }
            out.push('\n');
        }

        out
    }

    fn external_blocks(job: &Job) -> Vec<ExternalBlock> {
        let mut blocks = vec![ExternalBlock::Heading1 {
            content: format!("Code Review: {}", job.id),
        }];

        if let Some(summary) = &job.summary {
            let severity = top_severity_label(summary);
            blocks.push(ExternalBlock::Paragraph {
                content: format!(
                    "Severity: {severity} — {} issue(s) across {} file(s).",
                    summary.total_issues, summary.total_files
                ),
            });
        }

        if !job.issues.is_empty() {
            blocks.push(ExternalBlock::Heading2 {
                content: "Key Issues".to_owned(),
            });
            for issue in &job.issues {
                for chunk in split_into_blocks(&issue_line(issue), EXTERNAL_BLOCK_MAX_CHARS) {
                    blocks.push(ExternalBlock::BulletedListItem { content: chunk });
                }
            }
        }

        if let Some(executive_summary) = &job.executive_summary {
            if !executive_summary.trim().is_empty() {
                blocks.push(ExternalBlock::Heading2 {
                    content: "Executive Summary".to_owned(),
                });
                for chunk in split_into_blocks(executive_summary, EXTERNAL_BLOCK_MAX_CHARS) {
                    blocks.push(ExternalBlock::Paragraph { content: chunk });
                }
            }
        }

        if blocks.len() > MAX_EXTERNAL_BLOCKS {
            tracing::warn!(job_id = %job.id, block_count = blocks.len(), "external block document exceeded the cap, truncating");
            blocks.truncate(MAX_EXTERNAL_BLOCKS - 1);
            blocks.push(ExternalBlock::Paragraph {
                content: "Report truncated: too many blocks to render in full.".to_owned(),
            });
        }

        blocks
    }
}

impl ReportRenderer for TemplateReportRenderer {
    fn render(&self, job: &Job, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Json => Self::render_json(job),
            ReportFormat::Html => self.render_html(job),
            ReportFormat::Markdown => Ok(Self::render_markdown(job)),
        }
    }

    fn render_external_blocks(&self, job: &Job) -> Vec<ExternalBlock> {
        if job.status != JobStatus::Completed {
            return vec![ExternalBlock::Paragraph {
                content: format!("Job {} has not completed; no report is available.", job.id),
            }];
        }
        Self::external_blocks(job)
    }
}

fn severity_label(issue: &CodeIssue) -> &'static str {
    match issue.severity {
        mcb_domain::entities::IssueSeverity::Critical => "CRITICAL",
        mcb_domain::entities::IssueSeverity::High => "HIGH",
        mcb_domain::entities::IssueSeverity::Medium => "MEDIUM",
        mcb_domain::entities::IssueSeverity::Low => "LOW",
    }
}

fn category_label(issue: &CodeIssue) -> &'static str {
    use mcb_domain::entities::IssueCategory::*;
    match issue.category {
        Security => "SECURITY",
        Performance => "PERFORMANCE",
        Duplication => "DUPLICATION",
        Complexity => "COMPLEXITY",
        Testing => "TESTING",
        Documentation => "DOCUMENTATION",
        Style => "STYLE",
        Correctness => "CORRECTNESS",
        Maintainability => "MAINTAINABILITY",
    }
}

fn top_severity_label(summary: &mcb_domain::entities::AnalysisSummary) -> &'static str {
    if summary.severity_distribution.critical.count > 0 {
        "CRITICAL"
    } else if summary.severity_distribution.high.count > 0 {
        "HIGH"
    } else if summary.severity_distribution.medium.count > 0 {
        "MEDIUM"
    } else if summary.severity_distribution.low.count > 0 {
        "LOW"
    } else {
        "NONE"
    }
}

fn issue_line(issue: &CodeIssue) -> String {
    format!(
        "[{}] {} ({}:{})",
        severity_label(issue),
        issue.title,
        issue.file_path,
        issue.line_number.map_or_else(|| "-".to_owned(), |n| n.to_string())
    )
}

/// Split `text` into chunks of at most `max` characters, preserving char
/// boundaries. Returns one chunk for text already within the limit, zero
/// chunks for empty text.
fn split_into_blocks(text: &str, max: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.chars()
        .collect::<Vec<char>>()
        .chunks(max.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn html_context(job: &Job) -> serde_json::Value {
    let summary = job.summary.as_ref();
    let issues: Vec<serde_json::Value> = job
        .issues
        .iter()
        .map(|issue| {
            json!({
                "title": issue.title,
                "file_path": issue.file_path,
                "line": issue.line_number.map_or_else(|| "-".to_owned(), |n| n.to_string()),
                "severity": severity_label(issue),
                "category": category_label(issue),
                "description": issue.description,
                "suggestion": issue.suggestion,
                "ai_insight": issue.ai_review_context.as_ref().map(|c| c.rationale.clone()),
                "code_snippet": issue.code_snippet,
            })
        })
        .collect();

    json!({
        "job_id": job.id.to_string(),
        "summary": {
            "total_files": summary.map_or(0, |s| s.total_files),
            "total_issues": summary.map_or(0, |s| s.total_issues),
            "critical_count": summary.map_or(0, |s| s.severity_distribution.critical.count),
            "critical_pct": summary.map_or(0.0, |s| s.severity_distribution.critical.percentage),
            "high_count": summary.map_or(0, |s| s.severity_distribution.high.count),
            "high_pct": summary.map_or(0.0, |s| s.severity_distribution.high.percentage),
            "medium_count": summary.map_or(0, |s| s.severity_distribution.medium.count),
            "medium_pct": summary.map_or(0.0, |s| s.severity_distribution.medium.percentage),
            "low_count": summary.map_or(0, |s| s.severity_distribution.low.count),
            "low_pct": summary.map_or(0.0, |s| s.severity_distribution.low.percentage),
        },
        "issues": issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcb_domain::entities::{AnalysisSummary, DependencyGraph, IssueCategory, IssueSeverity, JobParams, LlmService};

    fn completed_job(issues: Vec<CodeIssue>) -> Job {
        let mut job = Job::new(JobParams {
            service: LlmService::LlmA,
            include_external_report: false,
            max_files: 10,
            include_patterns: Vec::new(),
            repo_url: None,
        });
        job.start();
        let summary = AnalysisSummary::from_issues(1, &issues);
        job.complete(summary, issues, DependencyGraph::empty());
        job
    }

    fn issue(title: &str, severity: IssueSeverity) -> CodeIssue {
        CodeIssue {
            id: format!("id-{title}"),
            category: IssueCategory::Security,
            severity,
            title: title.to_owned(),
            description: "a description".to_owned(),
            file_path: "app.py".to_owned(),
            line_number: Some(1),
            column: None,
            code_snippet: None,
            suggestion: "fix it".to_owned(),
            impact_score: 9,
            ai_review_context: None,
        }
    }

    #[test]
    fn json_render_round_trips_through_serde() {
        let job = completed_job(vec![issue("Hardcoded Secret Detected", IssueSeverity::Critical)]);
        let renderer = TemplateReportRenderer::new();
        let rendered = renderer.render(&job, ReportFormat::Json).unwrap();
        let parsed: Job = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed.id, job.id);
    }

    #[test]
    fn markdown_render_contains_severity_and_file_lines() {
        let job = completed_job(vec![issue("Hardcoded Secret Detected", IssueSeverity::Critical)]);
        let renderer = TemplateReportRenderer::new();
        let rendered = renderer.render(&job, ReportFormat::Markdown).unwrap();
        assert!(rendered.contains("**Severity**: CRITICAL"));
        assert!(rendered.lines().any(|l| l.starts_with("- **File**:") && l.contains("app.py")));
    }

    #[test]
    fn html_render_embeds_the_issue_title() {
        let job = completed_job(vec![issue("Hardcoded Secret Detected", IssueSeverity::Critical)]);
        let renderer = TemplateReportRenderer::new();
        let rendered = renderer.render(&job, ReportFormat::Html).unwrap();
        assert!(rendered.contains("Hardcoded Secret Detected"));
    }

    #[test]
    fn external_blocks_split_a_long_executive_summary() {
        let mut job = completed_job(vec![issue("Hardcoded Secret Detected", IssueSeverity::Critical)]);
        let long_summary = "x".repeat(5_000);
        job.set_executive_summary(Some(long_summary.clone()));

        let renderer = TemplateReportRenderer::new();
        let blocks = renderer.render_external_blocks(&job);

        let paragraphs: Vec<&String> = blocks
            .iter()
            .filter_map(|b| match b {
                ExternalBlock::Paragraph { content } => Some(content),
                _ => None,
            })
            .collect();
        assert!(paragraphs.len() >= 2);
        assert!(paragraphs.iter().all(|p| p.chars().count() <= EXTERNAL_BLOCK_MAX_CHARS));

        let summary_paragraphs: String = blocks
            .iter()
            .skip_while(|b| !matches!(b, ExternalBlock::Heading2 { content } if content == "Executive Summary"))
            .skip(1)
            .filter_map(|b| match b {
                ExternalBlock::Paragraph { content } => Some(content.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(summary_paragraphs, long_summary);
    }

    #[test]
    fn external_blocks_for_an_incomplete_job_return_a_placeholder() {
        let job = Job::new(JobParams {
            service: LlmService::LlmA,
            include_external_report: false,
            max_files: 10,
            include_patterns: Vec::new(),
            repo_url: None,
        });
        let renderer = TemplateReportRenderer::new();
        let blocks = renderer.render_external_blocks(&job);
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn split_into_blocks_yields_no_chunks_for_empty_text() {
        assert!(split_into_blocks("", 10).is_empty());
    }
}
