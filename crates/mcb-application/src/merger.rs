//! The Issue Merger (C6).
//!
//! Canonicalizes issues by stable id: AI-enhanced fields are merged into
//! existing analyzer-produced issues, genuinely new AI issues are appended,
//! and the final list is sorted deterministically.

use std::cmp::Reverse;
use std::collections::HashMap;

use mcb_domain::entities::{AiReviewContext, CodeIssue, IssueSeverity};

use crate::envelope::{AiEnvelope, EnhancedIssueUpdate, NewAiIssue};

/// Apply `envelope` onto `existing`, returning the final ordered issue list.
///
/// Re-running this with the same envelope twice is a no-op on the second
/// pass: enhancement fields are *replaced*, not appended, and new issues are
/// only inserted when their id is not already present.
#[must_use]
pub fn merge_issues(existing: Vec<CodeIssue>, envelope: &AiEnvelope) -> Vec<CodeIssue> {
    let mut by_id: HashMap<String, CodeIssue> =
        existing.into_iter().map(|issue| (issue.id.clone(), issue)).collect();

    for update in &envelope.enhanced_issues {
        apply_enhancement(&mut by_id, update);
    }

    let mut dropped = 0usize;
    for new_issue in &envelope.new_issues_found {
        if by_id.contains_key(&new_issue.id) {
            dropped += 1;
            continue;
        }
        by_id.insert(new_issue.id.clone(), to_code_issue(new_issue));
    }
    if dropped > 0 {
        tracing::debug!(dropped, "dropped AI-reported issues colliding with existing ids");
    }

    let mut issues: Vec<CodeIssue> = by_id.into_values().collect();
    sort_issues(&mut issues);
    issues
}

fn apply_enhancement(by_id: &mut HashMap<String, CodeIssue>, update: &EnhancedIssueUpdate) {
    let Some(issue) = by_id.get_mut(&update.id) else {
        // No existing issue with this id: as below, treat as if new.
        by_id.insert(
            update.id.clone(),
            CodeIssue {
                id: update.id.clone(),
                category: mcb_domain::entities::IssueCategory::Maintainability,
                severity: update.severity.unwrap_or(IssueSeverity::Medium),
                title: update.title.clone().unwrap_or_else(|| "AI-Reported Issue".to_owned()),
                description: update.description.clone().unwrap_or_default(),
                file_path: update.file_path.clone().unwrap_or_default(),
                line_number: update.line_number,
                column: None,
                code_snippet: None,
                suggestion: update.suggestion.clone().unwrap_or_default(),
                impact_score: update.impact_score.unwrap_or(5),
                ai_review_context: Some(AiReviewContext {
                    rationale: update.rationale.clone().unwrap_or_default(),
                    newly_discovered: true,
                }),
            },
        );
        return;
    };

    if let Some(suggestion) = &update.suggestion {
        issue.suggestion = suggestion.clone();
    }
    if let Some(score) = update.impact_score {
        issue.impact_score = score;
    }
    if let Some(severity) = update.severity {
        issue.severity = severity;
    }
    if let Some(description) = &update.description {
        issue.description = description.clone();
    }
    if let Some(title) = &update.title {
        issue.title = title.clone();
    }
    issue.ai_review_context = Some(AiReviewContext {
        rationale: update.rationale.clone().unwrap_or_default(),
        newly_discovered: false,
    });
}

fn to_code_issue(new_issue: &NewAiIssue) -> CodeIssue {
    CodeIssue {
        id: new_issue.id.clone(),
        category: new_issue.category,
        severity: new_issue.severity,
        title: new_issue.title.clone(),
        description: new_issue.description.clone(),
        file_path: new_issue.file_path.clone(),
        line_number: new_issue.line_number,
        column: None,
        code_snippet: new_issue.code_snippet.clone(),
        suggestion: new_issue.suggestion.clone(),
        impact_score: new_issue.impact_score,
        ai_review_context: Some(AiReviewContext {
            rationale: new_issue.rationale.clone(),
            newly_discovered: true,
        }),
    }
}

/// Sort by severity descending (CRITICAL..LOW), then `(file_path, line_number)`
/// ascending for deterministic output.
fn sort_issues(issues: &mut [CodeIssue]) {
    issues.sort_by(|a, b| {
        Reverse(a.severity)
            .cmp(&Reverse(b.severity))
            .then_with(|| a.file_path.cmp(&b.file_path))
            .then_with(|| a.line_number.cmp(&b.line_number))
    });
}

#[cfg(test)]
mod tests {
    use mcb_domain::entities::IssueCategory;

    use super::*;

    fn issue(id: &str, severity: IssueSeverity, file: &str, line: usize) -> CodeIssue {
        CodeIssue {
            id: id.to_owned(),
            category: IssueCategory::Style,
            severity,
            title: "t".to_owned(),
            description: "d".to_owned(),
            file_path: file.to_owned(),
            line_number: Some(line),
            column: None,
            code_snippet: None,
            suggestion: String::new(),
            impact_score: 1,
            ai_review_context: None,
        }
    }

    #[test]
    fn enhancement_updates_fields_without_duplicating() {
        let existing = vec![issue("a.py-1-x", IssueSeverity::Low, "a.py", 1)];
        let envelope = AiEnvelope {
            enhanced_issues: vec![EnhancedIssueUpdate {
                id: "a.py-1-x".to_owned(),
                suggestion: Some("fix it".to_owned()),
                impact_score: Some(7),
                severity: Some(IssueSeverity::High),
                description: None,
                title: None,
                rationale: Some("because".to_owned()),
                file_path: None,
                line_number: None,
            }],
            ..Default::default()
        };

        let merged = merge_issues(existing, &envelope);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].suggestion, "fix it");
        assert_eq!(merged[0].severity, IssueSeverity::High);
        assert!(merged[0].ai_review_context.is_some());
    }

    #[test]
    fn new_issue_colliding_with_existing_id_is_dropped() {
        let existing = vec![issue("a.py-1-x", IssueSeverity::Low, "a.py", 1)];
        let envelope = AiEnvelope {
            new_issues_found: vec![NewAiIssue {
                id: "a.py-1-x".to_owned(),
                category: IssueCategory::Security,
                severity: IssueSeverity::Critical,
                title: "duplicate".to_owned(),
                description: String::new(),
                file_path: "a.py".to_owned(),
                line_number: Some(1),
                code_snippet: None,
                suggestion: String::new(),
                impact_score: 9,
                rationale: String::new(),
            }],
            ..Default::default()
        };

        let merged = merge_issues(existing, &envelope);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].category, IssueCategory::Style);
    }

    #[test]
    fn rerunning_with_same_envelope_is_a_no_op() {
        let existing = vec![issue("a.py-1-x", IssueSeverity::Low, "a.py", 1)];
        let envelope = AiEnvelope {
            enhanced_issues: vec![EnhancedIssueUpdate {
                id: "a.py-1-x".to_owned(),
                suggestion: Some("fix it".to_owned()),
                impact_score: Some(7),
                severity: Some(IssueSeverity::High),
                description: None,
                title: None,
                rationale: Some("because".to_owned()),
                file_path: None,
                line_number: None,
            }],
            ..Default::default()
        };

        let once = merge_issues(existing, &envelope);
        let twice = merge_issues(once.clone(), &envelope);
        assert_eq!(once.len(), twice.len());
        assert_eq!(once[0].suggestion, twice[0].suggestion);
        assert_eq!(once[0].severity, twice[0].severity);
    }

    #[test]
    fn sorts_by_severity_then_file_then_line() {
        let issues = vec![
            issue("1", IssueSeverity::Low, "b.py", 1),
            issue("2", IssueSeverity::Critical, "a.py", 5),
            issue("3", IssueSeverity::Critical, "a.py", 1),
        ];
        let mut sorted = issues;
        sort_issues(&mut sorted);
        assert_eq!(sorted[0].id, "3");
        assert_eq!(sorted[1].id, "2");
        assert_eq!(sorted[2].id, "1");
    }
}
