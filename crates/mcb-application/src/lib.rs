//! Application layer for the code-quality analysis service.
//!
//! Holds the use cases that sit between the HTTP surface and the concrete
//! providers: the workflow orchestrator (C8), the issue merger (C6), the
//! AI-review envelope repair pipeline, and the job submission/polling use
//! cases. Everything here depends only on [`mcb_domain::ports`] traits, never
//! on a concrete provider, so it can be unit-tested with mocks and re-used
//! regardless of which job store or LLM backend `mcb-providers` wires in.

pub mod envelope;
pub mod line_match;
pub mod merger;
pub mod orchestrator;
pub mod use_cases;

pub use envelope::{parse_ai_envelope, AiEnvelope, EnhancedIssueUpdate, NewAiIssue};
pub use merger::merge_issues;
pub use orchestrator::{run_workflow, OrchestratorDeps, WorkflowOutcome, WorkflowState};
pub use use_cases::{poll_job, render, submit_job, JobRunnerDeps, SubmitError};
