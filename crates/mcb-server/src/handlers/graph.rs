//! `GET /graph/{job_id}`.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use mcb_application::poll_job;
use mcb_domain::entities::{DependencyGraph, JobStatus};
use mcb_domain::error::Error;
use mcb_domain::value_objects::JobId;

use super::parse_job_id;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct GraphResponse {
    job_id: JobId,
    dependency_graph: DependencyGraph,
}

/// Return a completed job's dependency graph.
///
/// # Errors
/// Returns a 404 [`ApiError`] for an unknown job, or a 400 if the job has
/// not reached `COMPLETED`.
pub async fn get_graph(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<GraphResponse>, ApiError> {
    let id = parse_job_id(&job_id)?;
    let job = poll_job(id, state.job_store.as_ref()).await.map_err(ApiError::Domain)?;

    if job.status != JobStatus::Completed {
        return Err(ApiError::Domain(Error::input_validation(format!(
            "job {id} is not completed (status: {:?})",
            job.status
        ))));
    }

    Ok(Json(GraphResponse {
        job_id: id,
        dependency_graph: job.dependency_graph.unwrap_or_else(DependencyGraph::empty),
    }))
}
