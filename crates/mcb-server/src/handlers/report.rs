//! `POST /report`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use mcb_application::{poll_job, render};
use mcb_domain::ports::ReportFormat;

use super::parse_job_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Wire form of [`ReportFormat`] (`format ∈ {json,html,md}`).
#[derive(Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum ReportFormatDto {
    Json,
    Html,
    Md,
}

impl From<ReportFormatDto> for ReportFormat {
    fn from(value: ReportFormatDto) -> Self {
        match value {
            ReportFormatDto::Json => ReportFormat::Json,
            ReportFormatDto::Html => ReportFormat::Html,
            ReportFormatDto::Md => ReportFormat::Markdown,
        }
    }
}

#[derive(Deserialize)]
pub struct ReportRequest {
    job_id: String,
    format: ReportFormatDto,
}

/// Render a completed job's report in the requested format.
///
/// # Errors
/// Returns a 404 [`ApiError`] for an unknown job, or a 400 if the job has
/// not reached `COMPLETED`.
pub async fn post_report(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReportRequest>,
) -> Result<Response, ApiError> {
    let id = parse_job_id(&req.job_id)?;
    let job = poll_job(id, state.job_store.as_ref()).await.map_err(ApiError::Domain)?;

    let format: ReportFormat = req.format.into();
    let body = render(&job, format, state.renderer.as_ref()).map_err(ApiError::Domain)?;

    let content_type = match format {
        ReportFormat::Json => "application/json",
        ReportFormat::Html => "text/html; charset=utf-8",
        ReportFormat::Markdown => "text/markdown; charset=utf-8",
    };

    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}
