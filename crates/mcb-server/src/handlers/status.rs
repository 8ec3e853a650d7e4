//! `GET /status/{job_id}[?include_details]`.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use mcb_application::poll_job;
use mcb_domain::entities::{AnalysisSummary, CodeIssue, Job, JobStatus};
use mcb_domain::value_objects::JobId;

use super::parse_job_id;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize, Default)]
pub struct StatusQuery {
    #[serde(default)]
    include_details: bool,
}

/// `AnalysisStatusResponse`: the job's lifecycle snapshot, with
/// `summary`/`issues`/`error` attached only when `include_details` is set.
#[derive(Serialize)]
pub struct AnalysisStatusResponse {
    job_id: JobId,
    status: JobStatus,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<AnalysisSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<Vec<CodeIssue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl AnalysisStatusResponse {
    fn from_job(job: &Job, include_details: bool) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            created_at: job.created_at,
            completed_at: job.completed_at,
            summary: include_details.then(|| job.summary.unwrap_or_default()),
            issues: include_details.then(|| job.issues.clone()),
            error: include_details.then(|| job.error.clone()).flatten(),
        }
    }
}

/// Poll a job's current status.
///
/// # Errors
/// Returns a 404 [`ApiError`] if `job_id` does not identify a known job.
pub async fn get_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<AnalysisStatusResponse>, ApiError> {
    let id = parse_job_id(&job_id)?;
    let job = poll_job(id, state.job_store.as_ref()).await.map_err(ApiError::Domain)?;
    Ok(Json(AnalysisStatusResponse::from_job(&job, query.include_details)))
}
