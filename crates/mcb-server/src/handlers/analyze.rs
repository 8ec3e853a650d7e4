//! `POST /analyze/remote` and `POST /analyze/upload`: the two
//! submission entry points for C1 (Source Fetcher). Both validate
//! synchronously ( `InputValidation` is "surfaced to the client at
//! submission time") and hand off to [`mcb_application::submit_job`] for
//! everything after.

use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mcb_application::submit_job;
use mcb_domain::entities::{JobParams, JobStatus, LlmService};
use mcb_domain::error::Error;
use mcb_domain::value_objects::JobId;
use mcb_providers::{fetch_remote_working_set, parse_github_url, validate_upload_paths};

use crate::error::ApiError;
use crate::state::AppState;

/// Sanity bound on the number of parts a single upload may contain,
/// independent of the per-job `max_files` analysis cap (which truncates
/// gracefully at discovery time); this guards against a
/// pathologically large multipart body before any of that work begins.
const MAX_UPLOAD_PARTS: usize = 2_000;

fn default_max_files() -> usize {
    200
}

/// `{job_id, status=PENDING, created_at}`.
#[derive(Serialize)]
pub struct SubmissionResponse {
    job_id: JobId,
    status: JobStatus,
    created_at: DateTime<Utc>,
}

impl SubmissionResponse {
    fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            status: JobStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[derive(Deserialize)]
pub struct AnalyzeRemoteRequest {
    repo_url: String,
    service: LlmService,
    #[serde(default)]
    include_external_report: bool,
    #[serde(default = "default_max_files")]
    max_files: usize,
    #[serde(default)]
    include_patterns: Vec<String>,
}

/// Submit a remote-repository analysis job.
///
/// # Errors
/// Returns a 400 [`ApiError`] for a malformed `repo_url` or an unreachable
/// remote host; a 400 if the fetched working set is empty.
pub async fn analyze_remote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRemoteRequest>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let (owner, repo) = parse_github_url(&req.repo_url).map_err(ApiError::Domain)?;
    let files = fetch_remote_working_set(state.remote_repo_client.as_ref(), &owner, &repo, req.max_files)
        .await
        .map_err(ApiError::Domain)?;

    let params = JobParams {
        service: req.service,
        include_external_report: req.include_external_report,
        max_files: req.max_files,
        include_patterns: req.include_patterns,
        repo_url: Some(req.repo_url),
    };
    let deps = state.job_runner_deps(req.service);
    let job_id = submit_job(files, params, deps).await?;
    Ok(Json(SubmissionResponse::new(job_id)))
}

/// Submit an uploaded-bundle analysis job.
///
/// Non-file multipart fields recognized: `service` (required,
/// `llm_a`/`llm_b`), `include_external_report` (optional bool), `max_files`
/// (optional, default 200). Every other part is treated as a file, keyed
/// by its part's filename.
///
/// # Errors
/// Returns a 400 [`ApiError`] for a malformed multipart body, a missing
/// `service` field, a path-traversal filename, or an empty working set;
/// a 413 if the part count exceeds [`MAX_UPLOAD_PARTS`].
pub async fn analyze_upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();
    let mut service: Option<LlmService> = None;
    let mut include_external_report = false;
    let mut max_files = default_max_files();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Domain(Error::input_validation(format!("malformed multipart body: {e}"))))?
    {
        if files.len() + 1 > MAX_UPLOAD_PARTS {
            return Err(ApiError::Domain(Error::input_validation(format!(
                "upload exceeds the {MAX_UPLOAD_PARTS}-file sanity limit"
            ))));
        }

        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "service" => {
                let text = field_text(field).await?;
                service = Some(parse_service(&text)?);
            }
            "include_external_report" => {
                let text = field_text(field).await?;
                include_external_report = text.eq_ignore_ascii_case("true") || text == "1";
            }
            "max_files" => {
                let text = field_text(field).await?;
                max_files = text
                    .parse()
                    .map_err(|_| ApiError::Domain(Error::input_validation(format!("invalid max_files: {text}"))))?;
            }
            _ => {
                let filename = field.file_name().unwrap_or(&name).to_owned();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Domain(Error::input_validation(format!("malformed upload part: {e}"))))?;
                files.push((filename, bytes.to_vec()));
            }
        }
    }

    let service = service.ok_or_else(|| ApiError::Domain(Error::input_validation("missing 'service' field")))?;
    let working_files = validate_upload_paths(files).map_err(ApiError::Domain)?;

    let params = JobParams {
        service,
        include_external_report,
        max_files,
        include_patterns: Vec::new(),
        repo_url: None,
    };
    let deps = state.job_runner_deps(service);
    let job_id = submit_job(working_files, params, deps).await?;
    Ok(Json(SubmissionResponse::new(job_id)))
}

async fn field_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::Domain(Error::input_validation(format!("malformed form field: {e}"))))
}

fn parse_service(text: &str) -> Result<LlmService, ApiError> {
    match text {
        "llm_a" => Ok(LlmService::LlmA),
        "llm_b" => Ok(LlmService::LlmB),
        other => Err(ApiError::Domain(Error::input_validation(format!(
            "unrecognized service '{other}', expected 'llm_a' or 'llm_b'"
        )))),
    }
}
