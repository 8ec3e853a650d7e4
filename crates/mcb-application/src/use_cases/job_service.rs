//! Job submission and background execution.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use mcb_domain::entities::{Job, JobParams, WorkingFile};
use mcb_domain::ports::{ExternalReporter, JobStore, ReportRenderer};
use mcb_domain::value_objects::JobId;

use crate::orchestrator::{run_workflow, OrchestratorDeps};

/// Failure submitting a job, before any background work begins.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The working set was empty after discovery's filtering.
    #[error("no analyzable files were supplied")]
    EmptyWorkingSet,
    /// The job store rejected the initial insert.
    #[error(transparent)]
    Store(#[from] mcb_domain::error::Error),
}

/// Everything a job's background worker needs beyond the files and params
/// already captured on the `Job` record.
pub struct JobRunnerDeps {
    /// Orchestrator capability bundle (analyzers, LLM client, graph builder).
    pub orchestrator: OrchestratorDeps,
    /// Renderer used to produce external page blocks after completion.
    pub renderer: Arc<dyn ReportRenderer>,
    /// External reporter; `None` when not configured.
    pub external_reporter: Option<Arc<dyn ExternalReporter>>,
    /// Job store every handler and the background worker share.
    pub job_store: Arc<dyn JobStore>,
}

/// Submit a new job: insert it `PENDING`, then spawn the one background task
/// that will drive it to a terminal status.
///
/// # Errors
/// Returns [`SubmitError::EmptyWorkingSet`] if `files` is empty, or
/// [`SubmitError::Store`] if the initial insert fails.
pub async fn submit_job(
    files: Vec<WorkingFile>,
    params: JobParams,
    deps: Arc<JobRunnerDeps>,
) -> Result<JobId, SubmitError> {
    if files.is_empty() {
        return Err(SubmitError::EmptyWorkingSet);
    }

    let job = Job::new(params);
    let id = job.id;
    deps.job_store.add(job).await?;

    tokio::spawn(run_job(id, files, deps));

    Ok(id)
}

/// Look up a job's current snapshot.
///
/// # Errors
/// Returns [`mcb_domain::error::Error::NotFound`] if no job exists under `id`.
pub async fn poll_job(id: JobId, job_store: &dyn JobStore) -> mcb_domain::error::Result<Job> {
    job_store
        .get(id)
        .await
        .ok_or_else(|| mcb_domain::error::Error::not_found(format!("job {id}")))
}

/// The background worker body: owns `job`'s mutation rights until it reaches
/// a terminal status.
async fn run_job(id: JobId, files: Vec<WorkingFile>, deps: Arc<JobRunnerDeps>) {
    let Some(mut job) = deps.job_store.get(id).await else {
        tracing::error!(job_id = %id, "background worker started for a job that vanished");
        return;
    };

    job.start();
    if let Err(err) = deps.job_store.replace(id, job.clone()).await {
        tracing::error!(job_id = %id, error = %err, "failed to record job start");
        return;
    }
    tracing::info!(job_id = %id, "job processing started");

    let max_files = job.params.max_files;
    let cancel = CancellationToken::new();

    match run_workflow(files, max_files, &deps.orchestrator, &cancel).await {
        Ok(outcome) => {
            job.file_metadata = outcome.file_metadata;
            for message in outcome.errors {
                job.record_non_fatal(message);
            }
            let executive_summary = (!outcome.ai_review.executive_summary.trim().is_empty())
                .then(|| outcome.ai_review.executive_summary.clone());
            job.complete(outcome.summary, outcome.issues, outcome.dependency_graph);
            job.set_executive_summary(executive_summary);

            if let Err(err) = deps.job_store.replace(id, job.clone()).await {
                tracing::error!(job_id = %id, error = %err, "failed to persist completed job");
                return;
            }
            tracing::info!(job_id = %id, "job completed");

            if job.params.include_external_report {
                push_external_report(&job, deps.as_ref()).await;
            }
        }
        Err(err) => {
            job.fail(err.to_string());
            tracing::error!(job_id = %id, error = %err, "job failed");
            if let Err(store_err) = deps.job_store.replace(id, job).await {
                tracing::error!(job_id = %id, error = %store_err, "failed to persist failed job");
            }
        }
    }
}

/// Up to this many push attempts before the reporting step is given up on
/// (spec §7, `ExternalReporterFailure`: "retry up to three times ... on
/// final failure, log and mark the reporting step as failed without
/// failing the job itself"). The renderer already guarantees every block
/// is within the external API's length limit by construction (see
/// `TemplateReportRenderer::split_into_blocks`), so these retries exist
/// for transient push failures (network, rate limiting), not for
/// re-shrinking content.
const MAX_EXTERNAL_PUSH_ATTEMPTS: u32 = 3;

async fn push_external_report(job: &Job, deps: &JobRunnerDeps) {
    let Some(reporter) = &deps.external_reporter else {
        tracing::warn!(job_id = %job.id, "external report requested but no reporter configured");
        return;
    };

    let blocks = deps.renderer.render_external_blocks(job);
    let mut last_err = None;
    for attempt in 1..=MAX_EXTERNAL_PUSH_ATTEMPTS {
        match reporter.push_blocks(&blocks).await {
            Ok(()) => {
                tracing::info!(job_id = %job.id, attempt, "external report pushed");
                return;
            }
            Err(err) => {
                tracing::warn!(job_id = %job.id, attempt, error = %err, "external report push attempt failed");
                last_err = Some(err);
            }
        }
    }
    if let Some(err) = last_err {
        tracing::warn!(job_id = %job.id, error = %err, "external report push failed after retries; reporting step marked failed, job unaffected");
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use mcb_domain::entities::{FileOrigin, LlmService};
    use mcb_domain::ports::{ExternalBlock, JobPatch, ReportFormat};

    use super::*;

    #[derive(Default)]
    struct InMemoryStore {
        jobs: Mutex<HashMap<JobId, Job>>,
    }

    #[async_trait]
    impl JobStore for InMemoryStore {
        async fn add(&self, job: Job) -> mcb_domain::error::Result<()> {
            self.jobs.lock().unwrap().insert(job.id, job);
            Ok(())
        }
        async fn get(&self, id: JobId) -> Option<Job> {
            self.jobs.lock().unwrap().get(&id).cloned()
        }
        async fn update(&self, id: JobId, patch: JobPatch) -> mcb_domain::error::Result<()> {
            let mut jobs = self.jobs.lock().unwrap();
            let job = jobs
                .get_mut(&id)
                .ok_or_else(|| mcb_domain::error::Error::not_found(format!("job {id}")))?;
            if let Some(status) = patch.status {
                job.status = status;
            }
            job.errors.extend(patch.append_errors);
            Ok(())
        }
        async fn replace(&self, id: JobId, job: Job) -> mcb_domain::error::Result<()> {
            let mut jobs = self.jobs.lock().unwrap();
            if !jobs.contains_key(&id) {
                return Err(mcb_domain::error::Error::not_found(format!("job {id}")));
            }
            jobs.insert(id, job);
            Ok(())
        }
        async fn delete(&self, id: JobId) {
            self.jobs.lock().unwrap().remove(&id);
        }
        async fn list(&self) -> Vec<Job> {
            self.jobs.lock().unwrap().values().cloned().collect()
        }
    }

    struct StubRenderer;
    impl ReportRenderer for StubRenderer {
        fn render(&self, _job: &Job, _format: ReportFormat) -> mcb_domain::error::Result<String> {
            Ok(String::new())
        }
        fn render_external_blocks(&self, _job: &Job) -> Vec<ExternalBlock> {
            Vec::new()
        }
    }

    struct RecordingReporter {
        pushes: Mutex<usize>,
    }
    #[async_trait]
    impl ExternalReporter for RecordingReporter {
        async fn push_blocks(&self, _blocks: &[ExternalBlock]) -> mcb_domain::error::Result<()> {
            *self.pushes.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn params(include_external_report: bool) -> JobParams {
        JobParams {
            service: LlmService::LlmA,
            include_external_report,
            max_files: 10,
            include_patterns: Vec::new(),
            repo_url: None,
        }
    }

    fn deps(include_reporter: bool, store: Arc<InMemoryStore>) -> (Arc<JobRunnerDeps>, Arc<RecordingReporter>) {
        let reporter = Arc::new(RecordingReporter { pushes: Mutex::new(0) });
        let runner = Arc::new(JobRunnerDeps {
            orchestrator: OrchestratorDeps::default(),
            renderer: Arc::new(StubRenderer),
            external_reporter: include_reporter.then(|| reporter.clone() as Arc<dyn ExternalReporter>),
            job_store: store,
        });
        (runner, reporter)
    }

    #[tokio::test]
    async fn submit_rejects_an_empty_working_set() {
        let store = Arc::new(InMemoryStore::default());
        let (runner, _reporter) = deps(false, store);
        let result = submit_job(Vec::new(), params(false), runner).await;
        assert!(matches!(result, Err(SubmitError::EmptyWorkingSet)));
    }

    #[tokio::test]
    async fn submit_runs_the_job_to_completion() {
        let store = Arc::new(InMemoryStore::default());
        let (runner, reporter) = deps(true, store.clone());
        let files = vec![WorkingFile::new("a.py", b"x = 1\n".to_vec(), FileOrigin::Uploaded)];

        let id = submit_job(files, params(true), runner).await.unwrap();

        for _ in 0..50 {
            if let Some(job) = store.get(id).await {
                if job.status.is_terminal() {
                    break;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        let job = poll_job(id, store.as_ref()).await.unwrap();
        assert_eq!(job.status, mcb_domain::entities::JobStatus::Completed);
        assert_eq!(*reporter.pushes.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn poll_returns_not_found_for_an_unknown_id() {
        let store = InMemoryStore::default();
        let result = poll_job(JobId::new(), &store).await;
        assert!(matches!(result, Err(mcb_domain::error::Error::NotFound { .. })));
    }

    struct FlakyReporter {
        failures_before_success: usize,
        calls: Mutex<usize>,
    }
    #[async_trait]
    impl ExternalReporter for FlakyReporter {
        async fn push_blocks(&self, _blocks: &[ExternalBlock]) -> mcb_domain::error::Result<()> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls <= self.failures_before_success {
                return Err(mcb_domain::error::Error::external_reporter_failure("transient push failure"));
            }
            Ok(())
        }
    }

    fn job_for_push(include_external_report: bool) -> Job {
        Job::new(params(include_external_report))
    }

    #[tokio::test]
    async fn push_external_report_retries_and_recovers() {
        let reporter = Arc::new(FlakyReporter { failures_before_success: 2, calls: Mutex::new(0) });
        let deps = JobRunnerDeps {
            orchestrator: OrchestratorDeps::default(),
            renderer: Arc::new(StubRenderer),
            external_reporter: Some(reporter.clone() as Arc<dyn ExternalReporter>),
            job_store: Arc::new(InMemoryStore::default()),
        };
        let job = job_for_push(true);

        push_external_report(&job, &deps).await;

        assert_eq!(*reporter.calls.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn push_external_report_gives_up_after_max_attempts() {
        let reporter = Arc::new(FlakyReporter { failures_before_success: usize::MAX, calls: Mutex::new(0) });
        let deps = JobRunnerDeps {
            orchestrator: OrchestratorDeps::default(),
            renderer: Arc::new(StubRenderer),
            external_reporter: Some(reporter.clone() as Arc<dyn ExternalReporter>),
            job_store: Arc::new(InMemoryStore::default()),
        };
        let job = job_for_push(true);

        push_external_report(&job, &deps).await;

        assert_eq!(*reporter.calls.lock().unwrap(), MAX_EXTERNAL_PUSH_ATTEMPTS as usize);
    }
}
