//! Core domain entities: plain, serde-derived records with no I/O.

pub mod dependency_graph;
pub mod issue;
pub mod job;
pub mod metrics;
pub mod summary;
pub mod working_file;

pub use dependency_graph::{DependencyGraph, GraphLink, GraphNode};
pub use issue::{ai_issue_id, stable_issue_id, AiReviewContext, CodeIssue, IssueCategory, IssueSeverity};
pub use job::{Job, JobParams, JobStatus, LlmService};
pub use metrics::{FileMetadata, FileMetrics};
pub use summary::{AnalysisSummary, SeverityBucket, SeverityDistribution};
pub use working_file::{DiscoveredSet, FileOrigin, WorkingFile};
