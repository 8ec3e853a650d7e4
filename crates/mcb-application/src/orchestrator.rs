//! The Workflow Orchestrator (C8).
//!
//! Drives discovery -> per-language analyzers -> analyzer enhancement ->
//! AI review -> issue merge -> dependency graph as an explicit finite state
//! machine over `{Discovered, PyDone, JsDone, DockerDone, Reviewed, Rendered,
//! Failed, Cancelled}` (Design Note §9), rather than a library-specific state
//! graph. Rendering and the optional external-report push happen after this
//! function returns, once the caller has folded the outcome onto a `Job`
//! (see `use_cases::job_service`).
//!
//! Only an unrecoverable source-fetch-or-discovery failure
//! or an explicit cancellation aborts the job. A single language stage's
//! failure is recorded in `errors[]` and the orchestrator proceeds.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;

use mcb_domain::constants::{languages, DEFAULT_FAN_OUT, LLM_CONTENT_WINDOW_CHARS};
use mcb_domain::entities::{
    AnalysisSummary, CodeIssue, DependencyGraph, FileMetadata, FileMetrics, WorkingFile,
};
use mcb_domain::error::{Error, Result};
use mcb_domain::ports::{DependencyGraphBuilder, LanguageAnalyzer, LlmClient};

use crate::envelope::{parse_ai_envelope, AiEnvelope};
use crate::line_match::locate_snippet_line;
use crate::merger::merge_issues;
use crate::use_cases::discovery::{discover as discover_files, route_language_analysis};

/// States the orchestrator's job-level state machine can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// File discovery has classified the working set.
    Discovered,
    /// The python-like language stage has run (or was absent).
    PyDone,
    /// The JS-like language stage has run (or was absent).
    JsDone,
    /// The Dockerfile language stage has run (or was absent).
    DockerDone,
    /// The AI review stage has run (or was skipped/degraded).
    Reviewed,
    /// The report has been rendered and, if requested, pushed externally.
    Rendered,
    /// An unrecoverable fault aborted the job.
    Failed,
    /// The job was cancelled mid-pipeline.
    Cancelled,
}

/// Everything a running orchestrator produces; the caller (a job-runner use
/// case) writes these fields onto the stored [`mcb_domain::entities::Job`].
#[derive(Debug, Default)]
pub struct WorkflowOutcome {
    /// Final merged, sorted issue list.
    pub issues: Vec<CodeIssue>,
    /// Per-file metrics, one per analyzed file.
    pub metrics: Vec<FileMetrics>,
    /// Per-file LLM-derived metadata.
    pub file_metadata: std::collections::HashMap<String, FileMetadata>,
    /// Import graph over the working set.
    pub dependency_graph: DependencyGraph,
    /// Aggregate summary.
    pub summary: AnalysisSummary,
    /// Non-fatal diagnostics accumulated along the way.
    pub errors: Vec<String>,
    /// The AI review envelope, retained for diagnostics even when degraded.
    pub ai_review: AiEnvelope,
    /// State the machine ended in; always `Reviewed` on success since
    /// rendering happens downstream, once the caller has a `Job` to render.
    pub final_state: WorkflowState,
}

/// Capability bundle the orchestrator drives. All fields are domain ports;
/// no concrete provider type appears in this crate.
pub struct OrchestratorDeps {
    /// One analyzer per supported language tag.
    pub analyzers: Vec<Arc<dyn LanguageAnalyzer>>,
    /// Shared LLM handle used for both the enhancer (C4) and review (C5).
    /// `None` models "LLM unavailable" and every stage degrades gracefully.
    pub llm_client: Option<Arc<dyn LlmClient>>,
    /// Import-graph builder (C7).
    pub dependency_graph_builder: Arc<dyn DependencyGraphBuilder>,
    /// Per-language-stage fan-out.
    pub fan_out: usize,
}

impl Default for OrchestratorDeps {
    fn default() -> Self {
        Self {
            analyzers: Vec::new(),
            llm_client: None,
            dependency_graph_builder: Arc::new(NoopGraphBuilder),
            fan_out: DEFAULT_FAN_OUT,
        }
    }
}

struct NoopGraphBuilder;
impl DependencyGraphBuilder for NoopGraphBuilder {
    fn build(&self, _files: &[WorkingFile]) -> DependencyGraph {
        DependencyGraph::empty()
    }
}

/// Run the full workflow over `files`, producing a [`WorkflowOutcome`].
///
/// # Errors
/// Returns `Err` only for the two fatal kinds the orchestrator itself can
/// raise: [`Error::Cancelled`] (the token fired) and a propagated
/// [`Error::Unexpected`] from discovery. All other per-stage faults are
/// folded into `outcome.errors` and the function still returns `Ok`.
pub async fn run_workflow(
    files: Vec<WorkingFile>,
    max_files: usize,
    deps: &OrchestratorDeps,
    cancel: &CancellationToken,
) -> Result<WorkflowOutcome> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    let discovered = discover_files(&files, max_files);
    tracing::info!(total_files = files.len(), state = ?WorkflowState::Discovered, "workflow advanced");

    let mut issues = Vec::new();
    let mut metrics = Vec::new();
    let mut file_metadata = std::collections::HashMap::new();
    let mut errors = Vec::new();

    let order = route_language_analysis(&discovered);
    for language in order {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let paths = discovered.paths_for(language);
        if paths.is_empty() {
            continue;
        }
        let Some(analyzer) = deps.analyzers.iter().find(|a| a.language_tag() == language) else {
            errors.push(format!("no analyzer registered for language '{language}'"));
            continue;
        };

        let lookup: std::collections::HashMap<&str, &WorkingFile> =
            files.iter().map(|f| (f.path.as_str(), f)).collect();

        let results: Vec<_> = stream::iter(paths.iter())
            .map(|path| {
                let analyzer = Arc::clone(analyzer);
                let file = lookup.get(path.as_str()).copied();
                async move {
                    let Some(file) = file else {
                        return None;
                    };
                    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        analyzer.analyze(&file.path, &file.bytes)
                    }));
                    match outcome {
                        Ok(output) => Some(Ok(output)),
                        Err(_) => Some(Err(Error::analyzer_internal(file.path.clone(), "analyzer panicked"))),
                    }
                }
            })
            .buffer_unordered(deps.fan_out.max(1))
            .collect()
            .await;

        for result in results.into_iter().flatten() {
            match result {
                Ok(output) => {
                    issues.extend(output.issues);
                    metrics.push(output.metrics);
                }
                Err(err) => errors.push(err.to_string()),
            }
        }

        tracing::info!(language, "analyzer stage complete");
    }

    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    if let Some(llm) = &deps.llm_client {
        for file in &files {
            let file_issue_count = issues.iter().filter(|i| i.file_path == file.path).count();
            if file_issue_count == 0 {
                continue;
            }
            match enhance_file(llm.as_ref(), file, file_issue_count).await {
                Ok(metadata) => {
                    apply_enhancements(&mut issues, &file.path, &metadata);
                    file_metadata.insert(file.path.clone(), metadata);
                }
                Err(err) => errors.push(format!("enhancer skipped {}: {err}", file.path)),
            }
        }
    }

    let ai_review = if let Some(llm) = &deps.llm_client {
        run_ai_review(llm.as_ref(), &files, &issues, &file_metadata).await
    } else {
        AiEnvelope::empty_with_error("no LLM client configured")
    };
    if let Some(reason) = &ai_review.error {
        errors.push(format!("AI review degraded: {reason}"));
    }
    tracing::info!(state = ?WorkflowState::Reviewed, "workflow advanced");

    let merged = merge_issues(issues, &ai_review);

    let dependency_graph = deps.dependency_graph_builder.build(&files);
    let summary = AnalysisSummary::from_issues(discovered.total_files(), &merged);

    Ok(WorkflowOutcome {
        issues: merged,
        metrics,
        file_metadata,
        dependency_graph,
        summary,
        errors,
        ai_review,
        final_state: WorkflowState::Reviewed,
    })
}

async fn enhance_file(
    llm: &dyn LlmClient,
    file: &WorkingFile,
    issue_count: usize,
) -> Result<FileMetadata> {
    let text = file.text();
    let truncated = text.chars().count() > LLM_CONTENT_WINDOW_CHARS;
    let excerpt: String = text.chars().take(LLM_CONTENT_WINDOW_CHARS).collect();
    let prompt = format!(
        "path: {}\nissue_count: {issue_count}\ncontent:\n{excerpt}\n\nRespond with strict JSON: \
         {{\"truncated\":bool,\"description\":string,\"enhanced_suggestions\":{{issue_id: string}},\
         \"business_impact\":string,\"architectural_concerns\":[string]}}",
        file.path
    );
    let raw = llm.complete(&prompt).await?;
    Ok(parse_enhancer_envelope(&raw, truncated))
}

fn parse_enhancer_envelope(raw: &str, fallback_truncated: bool) -> FileMetadata {
    #[derive(serde::Deserialize)]
    struct Envelope {
        #[serde(default)]
        truncated: bool,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        enhanced_suggestions: std::collections::HashMap<String, String>,
        #[serde(default)]
        business_impact: Option<String>,
    }

    let value: Option<Envelope> = serde_json::from_str(raw.trim()).ok();
    match value {
        Some(envelope) => FileMetadata {
            summary: envelope.description,
            enhanced_suggestions: envelope.enhanced_suggestions,
            content_truncated: envelope.truncated || fallback_truncated,
            business_impact: envelope.business_impact,
        },
        None => FileMetadata {
            content_truncated: fallback_truncated,
            ..Default::default()
        },
    }
}

fn apply_enhancements(issues: &mut [CodeIssue], file_path: &str, metadata: &FileMetadata) {
    for issue in issues.iter_mut().filter(|i| i.file_path == file_path) {
        if let Some(extra) = metadata.enhanced_suggestions.get(&issue.id) {
            if issue.suggestion.is_empty() {
                issue.suggestion = extra.clone();
            } else {
                issue.suggestion = format!("{}\n{}", issue.suggestion, extra);
            }
        }
    }
}

async fn run_ai_review(
    llm: &dyn LlmClient,
    files: &[WorkingFile],
    issues: &[CodeIssue],
    file_metadata: &std::collections::HashMap<String, FileMetadata>,
) -> AiEnvelope {
    let prompt = build_review_prompt(files, issues, file_metadata);

    let first = llm.complete(&prompt).await;
    let raw = match first {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => return AiEnvelope::empty_with_error("empty LLM response"),
        Err(_first_err) => {
            let retry_prompt = format!(
                "Your previous response was not valid JSON. Return ONLY the JSON envelope, no prose.\n\n{prompt}"
            );
            match llm.complete(&retry_prompt).await {
                Ok(text) => text,
                Err(err) => return AiEnvelope::empty_with_error(err.to_string()),
            }
        }
    };

    let mut envelope = parse_ai_envelope(&raw);
    verify_line_numbers(&mut envelope, files);
    envelope
}

fn build_review_prompt(
    files: &[WorkingFile],
    issues: &[CodeIssue],
    file_metadata: &std::collections::HashMap<String, FileMetadata>,
) -> String {
    let issue_summary = issues
        .iter()
        .map(|i| format!("{}: {} ({:?}/{:?})", i.id, i.title, i.category, i.severity))
        .collect::<Vec<_>>()
        .join("\n");

    let mut file_sections = String::new();
    for file in files {
        let metadata = file_metadata.get(&file.path);
        if metadata.is_some_and(|m| m.content_truncated) {
            let gist = metadata.and_then(|m| m.summary.clone()).unwrap_or_default();
            file_sections.push_str(&format!("### {}\n(truncated) {gist}\n", file.path));
        } else {
            let excerpt: String = file.text().chars().take(LLM_CONTENT_WINDOW_CHARS).collect();
            file_sections.push_str(&format!("### {}\n{excerpt}\n", file.path));
        }
    }

    format!(
        "Existing issues:\n{issue_summary}\n\nFiles:\n{file_sections}\n\nRespond with strict JSON matching \
         the AiEnvelope schema: executive_summary, architecture_analysis, enhanced_issues[], \
         new_issues_found[], recommendations[], quality_metrics{{overall_score}}, technical_debt."
    )
}

fn verify_line_numbers(envelope: &mut AiEnvelope, files: &[WorkingFile]) {
    let lookup: std::collections::HashMap<&str, String> =
        files.iter().map(|f| (f.path.as_str(), f.text())).collect();
    for issue in &mut envelope.new_issues_found {
        let Some(snippet) = &issue.code_snippet else {
            continue;
        };
        if snippet.trim().is_empty() {
            continue;
        }
        if let Some(text) = lookup.get(issue.file_path.as_str()) {
            issue.line_number = locate_snippet_line(text, snippet);
        } else {
            issue.line_number = None;
        }
    }
}

/// Advance to the next state reachable from `current` given which language
/// groups are still outstanding (Design Note §9's `check_analysis_completion`).
#[must_use]
pub fn check_analysis_completion(current: WorkflowState, remaining_languages: &[&str]) -> WorkflowState {
    if remaining_languages.is_empty() {
        return WorkflowState::Reviewed;
    }
    match remaining_languages[0] {
        languages::PYTHON_LIKE => WorkflowState::PyDone,
        languages::JS_LIKE => WorkflowState::JsDone,
        languages::DOCKER => WorkflowState::DockerDone,
        _ => current,
    }
}
