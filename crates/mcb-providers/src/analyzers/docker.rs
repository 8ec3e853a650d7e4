//! Dockerfile analyzer, grounded on
//! `original_source/backend/analyzers/docker_analyzer.py`'s instruction-level
//! checks.

use std::sync::LazyLock;

use regex::Regex;

use mcb_domain::constants::languages;
use mcb_domain::entities::issue::stable_issue_id;
use mcb_domain::entities::{CodeIssue, FileMetrics, IssueCategory, IssueSeverity};
use mcb_domain::ports::{AnalysisOutput, LanguageAnalyzer};

/// Base images known to have reached end-of-life; flagged regardless of tag
/// specificity.
const OUTDATED_BASE_IMAGES: &[&str] = &[
    "ubuntu:14.04",
    "ubuntu:16.04",
    "debian:8",
    "debian:jessie",
    "node:8",
    "node:10",
    "python:2.7",
    "centos:6",
];

const SECRET_ENV_KEYWORDS: &[&str] = &["PASSWORD", "SECRET", "TOKEN", "API_KEY", "PRIVATE_KEY"];

static FROM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^FROM\s+(\S+)").unwrap());
static USER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^USER\s+\S+").unwrap());
static CMD_OR_ENTRYPOINT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(CMD|ENTRYPOINT)\s").unwrap());
static ADD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^ADD\s+(\S+)").unwrap());
static ENV_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^ENV\s+(\S+)[=\s]+(.+)$").unwrap());
static APT_GET_UPDATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"apt-get\s+update").unwrap());
static APT_GET_INSTALL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"apt-get\s+install").unwrap());
static NO_INSTALL_RECOMMENDS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"--no-install-recommends").unwrap());

/// [`LanguageAnalyzer`] for Dockerfiles.
#[derive(Debug, Default)]
pub struct DockerfileAnalyzer;

impl LanguageAnalyzer for DockerfileAnalyzer {
    fn language_tag(&self) -> &'static str {
        languages::DOCKER
    }

    fn analyze(&self, path: &str, bytes: &[u8]) -> AnalysisOutput {
        let text = String::from_utf8_lossy(bytes).into_owned();
        let lines: Vec<&str> = text.lines().collect();

        let mut issues = Vec::new();
        let mut has_user = false;
        let mut has_entrypoint_or_cmd = false;

        for (idx, raw_line) in lines.iter().enumerate() {
            let line_number = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if USER_RE.is_match(line) {
                has_user = true;
            }
            if CMD_OR_ENTRYPOINT_RE.is_match(line) {
                has_entrypoint_or_cmd = true;
            }

            if let Some(captures) = FROM_RE.captures(line) {
                check_base_image(&captures[1], path, line_number, &mut issues);
            }

            if let Some(captures) = ADD_RE.captures(line) {
                let source = &captures[1];
                if !source.starts_with("http://") && !source.starts_with("https://") && !source.ends_with(".tar")
                    && !source.ends_with(".tar.gz") && !source.ends_with(".tgz")
                {
                    push_issue(
                        &mut issues,
                        path,
                        line_number,
                        "`ADD` Used Where `COPY` Would Suffice",
                        IssueSeverity::Low,
                        IssueCategory::Style,
                        line,
                        "Prefer COPY for plain local files; reserve ADD for remote URLs and archive extraction.",
                    );
                }
            }

            if let Some(captures) = ENV_RE.captures(line) {
                let key = captures[1].to_ascii_uppercase();
                if SECRET_ENV_KEYWORDS.iter().any(|kw| key.contains(kw)) {
                    push_issue(
                        &mut issues,
                        path,
                        line_number,
                        "Secret-Like Value in `ENV`",
                        IssueSeverity::High,
                        IssueCategory::Security,
                        line,
                        "Pass secrets at runtime (build args with --secret, or an orchestrator's secret store), not a baked-in ENV.",
                    );
                }
            }

            if APT_GET_UPDATE_RE.is_match(line) && !APT_GET_INSTALL_RE.is_match(line) {
                push_issue(
                    &mut issues,
                    path,
                    line_number,
                    "`apt-get update` Without `install` in the Same Layer",
                    IssueSeverity::Low,
                    IssueCategory::Performance,
                    line,
                    "Combine `apt-get update` and `apt-get install` in one RUN so cache invalidation can't serve a stale index.",
                );
            }
            if APT_GET_INSTALL_RE.is_match(line) && !NO_INSTALL_RECOMMENDS_RE.is_match(line) {
                push_issue(
                    &mut issues,
                    path,
                    line_number,
                    "`apt-get install` Without `--no-install-recommends`",
                    IssueSeverity::Low,
                    IssueCategory::Performance,
                    line,
                    "Add --no-install-recommends to keep the image lean.",
                );
            }
        }

        if !has_user {
            push_issue(
                &mut issues,
                path,
                lines.len().max(1),
                "Missing `USER` Instruction",
                IssueSeverity::Medium,
                IssueCategory::Security,
                "",
                "Add a USER instruction so the container does not run as root.",
            );
        }
        if !has_entrypoint_or_cmd {
            push_issue(
                &mut issues,
                path,
                lines.len().max(1),
                "Missing `CMD` or `ENTRYPOINT`",
                IssueSeverity::Medium,
                IssueCategory::Correctness,
                "",
                "Add a CMD or ENTRYPOINT so the image has a defined default process.",
            );
        }

        AnalysisOutput {
            issues,
            metrics: FileMetrics {
                file_path: path.to_owned(),
                language: languages::DOCKER.to_owned(),
                loc: lines.len(),
                complexity_score: 0,
                duplication_percentage: 0.0,
                test_coverage: None,
            },
        }
    }
}

fn check_base_image(image: &str, path: &str, line_number: usize, issues: &mut Vec<CodeIssue>) {
    if OUTDATED_BASE_IMAGES.contains(&image) {
        push_issue(
            issues,
            path,
            line_number,
            "Outdated Base Image",
            IssueSeverity::High,
            IssueCategory::Security,
            image,
            "Upgrade to a maintained base image release.",
        );
        return;
    }

    match image.rsplit_once(':') {
        None => push_issue(
            issues,
            path,
            line_number,
            "Base Image Without an Explicit Tag",
            IssueSeverity::Medium,
            IssueCategory::Maintainability,
            image,
            "Pin an explicit tag so the build is reproducible.",
        ),
        Some((_, "latest")) => push_issue(
            issues,
            path,
            line_number,
            "Base Image Pinned to `:latest`",
            IssueSeverity::Medium,
            IssueCategory::Maintainability,
            image,
            "Pin a specific version tag instead of `:latest` so the build is reproducible.",
        ),
        Some(_) => {}
    }
}

fn push_issue(
    issues: &mut Vec<CodeIssue>,
    path: &str,
    line_number: usize,
    title: &str,
    severity: IssueSeverity,
    category: IssueCategory,
    snippet: &str,
    suggestion: &str,
) {
    issues.push(CodeIssue {
        id: stable_issue_id(path, Some(line_number), title),
        category,
        severity,
        title: title.to_owned(),
        description: format!("{title} ({path}:{line_number})."),
        file_path: path.to_owned(),
        line_number: Some(line_number),
        column: None,
        code_snippet: if snippet.is_empty() { None } else { Some(snippet.to_owned()) },
        suggestion: suggestion.to_owned(),
        impact_score: match severity {
            IssueSeverity::Critical => 9,
            IssueSeverity::High => 7,
            IssueSeverity::Medium => 5,
            IssueSeverity::Low => 2,
        },
        ai_review_context: None,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_a_missing_user_instruction() {
        let analyzer = DockerfileAnalyzer;
        let output = analyzer.analyze("Dockerfile", b"FROM python:3.12\nCMD [\"python\", \"app.py\"]\n");
        assert!(output.issues.iter().any(|i| i.title.contains("USER")));
    }

    #[test]
    fn flags_a_latest_tag() {
        let analyzer = DockerfileAnalyzer;
        let output = analyzer.analyze("Dockerfile", b"FROM python:latest\nUSER app\nCMD [\"python\"]\n");
        assert!(output.issues.iter().any(|i| i.title.contains("latest")));
    }

    #[test]
    fn flags_an_outdated_base_image() {
        let analyzer = DockerfileAnalyzer;
        let output = analyzer.analyze("Dockerfile", b"FROM ubuntu:14.04\nUSER app\nCMD [\"true\"]\n");
        assert!(output.issues.iter().any(|i| i.title == "Outdated Base Image"));
    }

    #[test]
    fn flags_a_secret_like_env_value() {
        let analyzer = DockerfileAnalyzer;
        let code = b"FROM python:3.12\nENV DB_PASSWORD=hunter2\nUSER app\nCMD [\"true\"]\n";
        let output = analyzer.analyze("Dockerfile", code);
        assert!(output.issues.iter().any(|i| i.category == IssueCategory::Security && i.title.contains("ENV")));
    }

    #[test]
    fn flags_a_missing_cmd_and_entrypoint() {
        let analyzer = DockerfileAnalyzer;
        let output = analyzer.analyze("Dockerfile", b"FROM python:3.12\nUSER app\n");
        assert!(output.issues.iter().any(|i| i.title.contains("CMD")));
    }

    #[test]
    fn clean_dockerfile_yields_no_issues() {
        let analyzer = DockerfileAnalyzer;
        let code = b"FROM python:3.12\nUSER app\nCMD [\"python\", \"app.py\"]\n";
        let output = analyzer.analyze("Dockerfile", code);
        assert!(output.issues.is_empty());
    }
}
