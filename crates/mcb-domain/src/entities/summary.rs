//! `AnalysisSummary` and the severity distribution table.

use serde::{Deserialize, Serialize};

use crate::entities::issue::{CodeIssue, IssueSeverity};

/// Count and percentage for a single severity bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityBucket {
    /// Number of issues at this severity.
    pub count: usize,
    /// Percentage of all issues at this severity, `0.0..=100.0`.
    pub percentage: f64,
}

/// Full four-bucket severity breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityDistribution {
    /// `CRITICAL` bucket.
    pub critical: SeverityBucket,
    /// `HIGH` bucket.
    pub high: SeverityBucket,
    /// `MEDIUM` bucket.
    pub medium: SeverityBucket,
    /// `LOW` bucket.
    pub low: SeverityBucket,
}

/// `{total_files, total_issues, severity_distribution}` summary of a
/// completed job.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Total number of files analyzed.
    pub total_files: usize,
    /// Total number of issues in the final merged list.
    pub total_issues: usize,
    /// Per-severity counts and percentages.
    pub severity_distribution: SeverityDistribution,
}

impl AnalysisSummary {
    /// A zeroed-out summary for jobs with no files or no issues.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compute a summary from the final issue list and total file count.
    ///
    /// Percentages are all zero when `total_issues == 0` (Open Question in
    /// §9, resolved explicitly rather than via `max(total, 1)`).
    #[must_use]
    pub fn from_issues(total_files: usize, issues: &[CodeIssue]) -> Self {
        let total_issues = issues.len();
        let mut critical = 0usize;
        let mut high = 0usize;
        let mut medium = 0usize;
        let mut low = 0usize;

        for issue in issues {
            match issue.severity {
                IssueSeverity::Critical => critical += 1,
                IssueSeverity::High => high += 1,
                IssueSeverity::Medium => medium += 1,
                IssueSeverity::Low => low += 1,
            }
        }

        let pct = |count: usize| {
            if total_issues == 0 {
                0.0
            } else {
                (count as f64 / total_issues as f64) * 100.0
            }
        };

        Self {
            total_files,
            total_issues,
            severity_distribution: SeverityDistribution {
                critical: SeverityBucket { count: critical, percentage: pct(critical) },
                high: SeverityBucket { count: high, percentage: pct(high) },
                medium: SeverityBucket { count: medium, percentage: pct(medium) },
                low: SeverityBucket { count: low, percentage: pct(low) },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::issue::IssueCategory;

    fn issue(severity: IssueSeverity) -> CodeIssue {
        CodeIssue {
            id: "x".into(),
            category: IssueCategory::Style,
            severity,
            title: "t".into(),
            description: "d".into(),
            file_path: "a.py".into(),
            line_number: Some(1),
            column: None,
            code_snippet: None,
            suggestion: String::new(),
            impact_score: 1,
            ai_review_context: None,
        }
    }

    #[test]
    fn zero_issues_yields_all_zero_percentages() {
        let summary = AnalysisSummary::from_issues(3, &[]);
        assert_eq!(summary.total_issues, 0);
        assert_eq!(summary.severity_distribution.critical.percentage, 0.0);
        assert_eq!(summary.severity_distribution.low.percentage, 0.0);
    }

    #[test]
    fn percentages_sum_to_100_within_tolerance() {
        let issues = vec![
            issue(IssueSeverity::Critical),
            issue(IssueSeverity::High),
            issue(IssueSeverity::Medium),
            issue(IssueSeverity::Low),
            issue(IssueSeverity::Low),
            issue(IssueSeverity::Low),
        ];
        let summary = AnalysisSummary::from_issues(1, &issues);
        let d = summary.severity_distribution;
        let total = d.critical.percentage + d.high.percentage + d.medium.percentage + d.low.percentage;
        assert!((total - 100.0).abs() < 0.1);
    }
}
