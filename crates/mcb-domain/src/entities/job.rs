//! The `Job` entity and its lifecycle.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::dependency_graph::DependencyGraph;
use crate::entities::issue::CodeIssue;
use crate::entities::metrics::FileMetadata;
use crate::entities::summary::AnalysisSummary;
use crate::value_objects::JobId;

/// Status of a [`Job`], monotonic along `PENDING -> PROCESSING -> {COMPLETED, FAILED}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Accepted, not yet picked up by a worker.
    Pending,
    /// A worker is actively running the pipeline for this job.
    Processing,
    /// The pipeline finished without a fatal error.
    Completed,
    /// The pipeline aborted with a fatal error.
    Failed,
}

impl JobStatus {
    /// Whether this status is terminal (`COMPLETED` or `FAILED`).
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether `next` is a legal successor of `self` under the monotonic
    /// `PENDING -> PROCESSING -> {COMPLETED, FAILED}` path.
    #[must_use]
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Processing)
                | (JobStatus::Pending, JobStatus::Failed)
                | (JobStatus::Processing, JobStatus::Completed)
                | (JobStatus::Processing, JobStatus::Failed)
        )
    }
}

/// Which analysis backend a job should use for the LLM-backed stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmService {
    /// The first configured LLM provider.
    LlmA,
    /// The second configured LLM provider.
    LlmB,
}

/// Parameters supplied at submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobParams {
    /// Which LLM backend to use for enhancement and review.
    pub service: LlmService,
    /// Whether to push a rendered report to the external reporter.
    pub include_external_report: bool,
    /// Maximum number of files to admit into the working set.
    pub max_files: usize,
    /// Optional glob-like include patterns narrowing the source tree.
    #[serde(default)]
    pub include_patterns: Vec<String>,
    /// Remote repository URL, when this job was submitted via `/analyze/remote`.
    #[serde(default)]
    pub repo_url: Option<String>,
}

/// A single submitted analysis job and everything it has produced so far.
///
/// Owned exclusively by the job store; mutated only by the worker executing
/// the workflow orchestrator. Once `status` reaches a terminal value the
/// record is immutable except for renderer-side reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: JobId,
    /// Current lifecycle status.
    pub status: JobStatus,
    /// Submission parameters.
    pub params: JobParams,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp, set once the job reaches a terminal status.
    pub completed_at: Option<DateTime<Utc>>,
    /// Aggregate summary, present once the job has produced issues.
    pub summary: Option<AnalysisSummary>,
    /// Final merged issue list, present once review has run.
    pub issues: Vec<CodeIssue>,
    /// Import graph over the working set, present once built.
    pub dependency_graph: Option<DependencyGraph>,
    /// Per-file LLM-derived metadata, keyed by file path.
    pub file_metadata: HashMap<String, FileMetadata>,
    /// Non-fatal errors accumulated during the run.
    pub errors: Vec<String>,
    /// Fatal error message, set iff `status == Failed`.
    pub error: Option<String>,
    /// AI review's executive summary, when the LLM review stage produced one.
    pub executive_summary: Option<String>,
}

impl Job {
    /// Construct a new job in `PENDING` status.
    #[must_use]
    pub fn new(params: JobParams) -> Self {
        Self {
            id: JobId::new(),
            status: JobStatus::Pending,
            params,
            created_at: Utc::now(),
            completed_at: None,
            summary: None,
            issues: Vec::new(),
            dependency_graph: None,
            file_metadata: HashMap::new(),
            errors: Vec::new(),
            error: None,
            executive_summary: None,
        }
    }

    /// Transition to `PROCESSING`.
    ///
    /// # Panics
    /// Panics if the current status cannot legally transition to `PROCESSING`;
    /// this would indicate a worker bug (double-dispatch of the same job).
    pub fn start(&mut self) {
        assert!(
            self.status.can_transition_to(JobStatus::Processing),
            "illegal transition from {:?} to Processing",
            self.status
        );
        self.status = JobStatus::Processing;
    }

    /// Transition to `COMPLETED`, attaching the produced artifacts.
    pub fn complete(
        &mut self,
        summary: AnalysisSummary,
        issues: Vec<CodeIssue>,
        dependency_graph: DependencyGraph,
    ) {
        self.summary = Some(summary);
        self.issues = issues;
        self.dependency_graph = Some(dependency_graph);
        self.status = JobStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Transition to `FAILED` with the given fatal error message.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
    }

    /// Append a non-fatal error to the running diagnostic log.
    pub fn record_non_fatal(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Attach the AI review's executive summary, if the review stage produced
    /// a non-empty one.
    pub fn set_executive_summary(&mut self, summary: Option<String>) {
        self.executive_summary = summary;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> JobParams {
        JobParams {
            service: LlmService::LlmA,
            include_external_report: false,
            max_files: 100,
            include_patterns: Vec::new(),
            repo_url: None,
        }
    }

    #[test]
    fn starts_in_pending() {
        let job = Job::new(params());
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn completes_sets_timestamp_after_created() {
        let mut job = Job::new(params());
        job.start();
        job.complete(
            AnalysisSummary::empty(),
            Vec::new(),
            DependencyGraph::default(),
        );
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.unwrap() >= job.created_at);
    }

    #[test]
    fn fail_sets_error_and_terminal_status() {
        let mut job = Job::new(params());
        job.start();
        job.fail("cancelled");
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("cancelled"));
    }

    #[test]
    #[should_panic(expected = "illegal transition")]
    fn cannot_start_twice() {
        let mut job = Job::new(params());
        job.start();
        job.start();
    }

    #[test]
    fn status_transitions_are_monotonic() {
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Processing));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Completed));
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Processing));
        assert!(!JobStatus::Pending.can_transition_to(JobStatus::Completed));
    }
}
